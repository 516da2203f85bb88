//! `thorpack deps` command

use anyhow::Result;

use crate::cli::DepsArgs;
use crate::GlobalOptions;
use thorpack::builder::configure::ROOT_FLAGS;
use thorpack::core::dependency::DependencySet;

pub fn execute(args: DepsArgs, global: &GlobalOptions) -> Result<()> {
    let shell = global.shell(args.json);
    let deps = DependencySet::required();

    if shell.is_json() {
        let entries: Vec<_> = deps
            .iter()
            .map(|dep| {
                serde_json::json!({
                    "name": dep.name(),
                    "version": dep.version().to_string(),
                    "requirement": dep.version_req().to_string(),
                })
            })
            .collect();
        shell.json_event(&serde_json::json!({ "dependencies": entries }));
        return Ok(());
    }

    for dep in deps.iter() {
        match ROOT_FLAGS.iter().find(|flag| flag.key == dep.name()) {
            Some(flag) => println!("{:<18} --with-{}-root", dep.to_string(), flag.token),
            None => println!("{}", dep),
        }
    }

    Ok(())
}
