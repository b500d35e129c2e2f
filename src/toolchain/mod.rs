/*!
# TChecker toolchain integration

Everything that talks to the external binaries: process launching, the
stderr translator and the three dispatchers (syntax check, model checking,
interactive simulation).
*/

pub mod model_check;
pub mod runner;
pub mod simulation;
pub mod syntax;
pub mod translator;

pub use model_check::{run_model_check, ModelCheckMode, ModelCheckReport};
pub use runner::{run_once, ToolOutput};
pub use simulation::{
    SimulationEvent, SimulationFrontend, SimulationOutput, SimulationState, Simulator,
};
pub use syntax::{run_syntax_check, SyntaxOutcome};
pub use translator::translate;
