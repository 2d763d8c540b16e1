use regcheck_core::api::{BenchmarkTest, CliError, Selector};

use super::cli::{SelectArgs, ShowArgs};
use crate::app::Loaded;

fn summary(t: &BenchmarkTest) -> String {
    let def = t.definition();
    let tags: Vec<&str> = def.tags.iter().map(String::as_str).collect();
    format!(
        "{:<24} tags=[{}] systems=[{}] environs=[{}]",
        def.name,
        tags.join(","),
        def.valid_systems.join(","),
        def.valid_environments.join(",")
    )
}

pub fn list(loaded: &Loaded, args: SelectArgs) -> Result<i32, CliError> {
    let selector = Selector {
        names: args.names,
        tags: args.tags,
    };
    let selected = selector.select(&loaded.tests);
    for t in &selected {
        println!("{}", summary(t));
    }
    println!("Found {} test(s)", selected.len());
    Ok(0)
}

pub fn show(loaded: &Loaded, args: ShowArgs) -> Result<i32, CliError> {
    let t = loaded.find(&args.name)?;
    let v = serde_json::json!({
        "definition": t.definition(),
        "hooks": t
            .hooks()
            .iter()
            .map(|h| format!("{} {}: {}", h.when.as_str(), h.phase, h.name))
            .collect::<Vec<_>>(),
        "sanity": t.sanity_checks(),
        "performance": t.performance_functions(),
    });
    let text = serde_json::to_string_pretty(&v).map_err(|e| CliError::Command(e.to_string()))?;
    println!("{text}");
    Ok(0)
}
