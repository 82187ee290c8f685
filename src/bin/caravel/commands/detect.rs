//! `caravel detect` command
//!
//! Prints the profile that would be generated for the given toolchain
//! state, without touching the external tool.

use anyhow::Result;

use crate::cli::DetectArgs;

use super::provide::build_state;

pub fn execute(args: DetectArgs) -> Result<()> {
    let state = build_state(args.state);
    let profile = state.detect_profile(&args.build_type)?;
    print!("{}", profile.render());
    Ok(())
}
