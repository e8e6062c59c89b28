//! # CLI Module
//!
//! The command-line layer of the shuffler. It wires configuration, the local
//! OAuth server and the browser together for a single run and reports the
//! outcome to the terminal.
//!
//! ## Run Lifecycle
//!
//! ```text
//! shuffle
//!   ├── bind local server (login / callback / randomize / health)
//!   ├── open browser on the login route
//!   ├── poll run status every poll interval
//!   │     ├── Finished → print report table
//!   │     ├── Failed   → return error
//!   │     └── no login within the login timeout → return error
//!   └── return; the server task ends with the process
//! ```
//!
//! ## Usage Patterns
//!
//! ```bash
//! playlist-shuffler shuffle --playlist 37i9dQZF1DXcBWIGoYBM5M
//! playlist-shuffler shuffle --no-browser
//! playlist-shuffler completions zsh
//! ```

mod shuffle;

pub use shuffle::print_reports;
pub use shuffle::shuffle;
pub use shuffle::wait_for_outcome;
