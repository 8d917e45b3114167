//! Battle engine: controllers, turn structure and the battle loop

/// Macro for conditional logging that avoids allocation when feature is disabled
///
/// When the verbose-logging feature is disabled this becomes a no-op at compile
/// time, so the `format!` in hot turn code costs nothing in benchmarks.
macro_rules! log_if_verbose {
    ($logger:expr, $level:ident, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $logger.$level(&format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$logger;
        }
    };
}

pub mod battle;
pub mod combat;
pub mod controller;
pub mod first_choice_controller;
pub mod interactive_controller;
pub mod logger;
pub mod phase;
pub mod random_controller;
pub mod turn;

pub use battle::{Battle, BattleConfig, BattleEndReason, BattleResult, PlayerSlot};
pub use controller::{BattleController, BattleView, HandDecision, SupportOption};
pub use first_choice_controller::FirstChoiceController;
pub use interactive_controller::InteractiveController;
pub use logger::{BattleLogger, LogEntry, OutputFormat, OutputMode, VerbosityLevel};
pub use phase::{BattleOutcome, Phase, Step, TurnResult};
pub use random_controller::RandomController;
pub use turn::Turn;
