pub mod channel;
pub mod mock;
pub mod process;
pub mod sequencer;

pub use channel::DeviceChannel;
pub use mock::{DeviceCommand, MockDevice};
pub use process::ProcessChannel;
pub use sequencer::{DeviceSequencer, DeviceState};
