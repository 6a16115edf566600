//! OS process adapters: the process table probe and the script launcher.

mod launcher;
mod probe;

pub use launcher::{ScriptInterpreter, ScriptProcessLauncher};
pub use probe::{SysinfoProcessProbe, is_live_status};
