//! `thorpack validate` command

use anyhow::Result;

use crate::cli::ValidateArgs;
use crate::GlobalOptions;
use thorpack::builder::toolchain::{detect_toolchain, validate, Toolchain};
use thorpack::core::language::CppStandard;
use thorpack::util::shell::Status;
use thorpack::util::GlobalContext;

pub fn execute(args: ValidateArgs, global: &GlobalOptions) -> Result<()> {
    let shell = global.shell(args.json);
    let ctx = GlobalContext::new()?;
    let config = ctx.load_config();

    let toolchain = detect_toolchain(&super::toolchain_settings(&config, &args.toolchain))?;
    let result = validate(&toolchain);

    if shell.is_json() {
        shell.json_event(&serde_json::json!({
            "compiler": toolchain.describe(),
            "required": CppStandard::MINIMUM.generation(),
            "supported": toolchain.max_standard().map(|std| std.generation()),
            "configured": toolchain.configured_standard().map(|std| std.generation()),
            "ok": result.is_ok(),
        }));
    }

    let standard = result?;
    shell.status(
        Status::Finished,
        format!("{} builds with {}", toolchain.describe(), standard),
    );

    Ok(())
}
