use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use stencil_core::{import, AccessPolicy, Context, PolicyConfig, Result, Value, ViewKind};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "stencil", version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a template path against JSON data
    Resolve {
        /// JSON file holding the data to render against
        #[arg(long)]
        data: PathBuf,

        /// Dotted/bracket path to resolve, e.g. `todo_items[0].title`
        #[arg(long)]
        path: String,

        /// Path of a nested value to use as the innermost scope
        #[arg(long)]
        scope: Option<String>,

        /// Policy file (TOML); the built-in policy is used when omitted
        #[arg(long)]
        policy: Option<PathBuf>,

        /// Keep the data as plain values instead of records and collections
        #[arg(long)]
        plain: bool,
    },
    /// List the member names blocked for templates
    Policy {
        /// Policy file (TOML); the built-in policy is used when omitted
        #[arg(long)]
        policy: Option<PathBuf>,

        /// Only list this kind (`record` or `collection`)
        #[arg(long)]
        kind: Option<ViewKind>,
    },
}

#[derive(Debug, PartialEq)]
enum Output {
    Found(Value),
    NotFound,
    Names(Vec<String>),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match execute(cli.command) {
        Ok(Output::Found(value)) => match serde_json::to_string_pretty(&value.to_json()) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => {
                error!("Failed to render value: {}", e);
                std::process::exit(1);
            }
        },
        Ok(Output::NotFound) => {
            println!("<not found>");
            std::process::exit(1);
        }
        Ok(Output::Names(names)) => {
            for name in names {
                println!("{}", name);
            }
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

fn load_policy(path: Option<&Path>) -> Result<AccessPolicy> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading policy");
            Ok(AccessPolicy::from_config(&PolicyConfig::load(path)?))
        }
        None => Ok(AccessPolicy::default()),
    }
}

fn execute(command: Commands) -> Result<Output> {
    match command {
        Commands::Resolve {
            data,
            path,
            scope,
            policy,
            plain,
        } => {
            let policy = load_policy(policy.as_deref())?;
            let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&data)?)?;
            let root = if plain { Value::from(json) } else { import(json) };
            let root_ctx = Context::new(root);

            let found = match scope {
                Some(scope) => {
                    let Some(view) = root_ctx.lookup_with(&policy, &scope) else {
                        return Ok(Output::NotFound);
                    };
                    let discovered = Context::new(view.clone());
                    if discovered.parent().is_some() {
                        discovered.lookup_with(&policy, &path)
                    } else {
                        // Nothing to discover from; the data root encloses the scope.
                        Context::with_parent(view, &root_ctx).lookup_with(&policy, &path)
                    }
                }
                None => root_ctx.lookup_with(&policy, &path),
            };

            Ok(found.map_or(Output::NotFound, Output::Found))
        }
        Commands::Policy { policy, kind } => {
            let policy = load_policy(policy.as_deref())?;
            let kinds = match kind {
                Some(kind) => vec![kind],
                None => vec![ViewKind::Record, ViewKind::Collection],
            };
            let names = kinds
                .into_iter()
                .flat_map(|kind| {
                    policy
                        .blocked_names(kind)
                        .into_iter()
                        .map(move |name| format!("{}\t{}", kind, name))
                        .collect::<Vec<_>>()
                })
                .collect();
            Ok(Output::Names(names))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn data_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"title": "Todos", "todo_items": [{{"title": "first", "completed": false}}, {{"title": "second"}}]}}"#
        )
        .unwrap();
        file
    }

    fn resolve(args: &[&str]) -> Output {
        let cli = Cli::try_parse_from(args).unwrap();
        execute(cli.command).unwrap()
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from(["stencil", "resolve", "--data", "d.json", "--path", "a.b", "--plain"]).unwrap();
        match cli.command {
            Commands::Resolve { path, plain, scope, .. } => {
                assert_eq!(path, "a.b");
                assert!(plain);
                assert!(scope.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(Cli::try_parse_from(["stencil", "resolve", "--path", "a"]).is_err());
        assert!(Cli::try_parse_from(["stencil", "policy", "--kind", "widget"]).is_err());
    }

    #[test]
    fn test_resolve_paths() {
        let file = data_file();
        let data = file.path().to_str().unwrap();

        assert_eq!(
            resolve(&["stencil", "resolve", "--data", data, "--path", "todo_items.1.title"]),
            Output::Found(Value::from("second"))
        );
        assert_eq!(
            resolve(&["stencil", "resolve", "--data", data, "--path", "todo_items.models"]),
            Output::NotFound
        );
    }

    #[test]
    fn test_resolve_in_scope() {
        let file = data_file();
        let data = file.path().to_str().unwrap();

        for plain in [false, true] {
            let mut args = vec![
                "stencil", "resolve", "--data", data, "--scope", "todo_items[0]", "--path",
                "title",
            ];
            if plain {
                args.push("--plain");
            }
            assert_eq!(resolve(&args), Output::Found(Value::from("first")));

            args[7] = "todo_items.length";
            assert_eq!(resolve(&args), Output::Found(Value::from(2u64)));
        }
    }

    #[test]
    fn test_user_field_named_like_storage() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"attributes": {{"secret": 1}}}}"#).unwrap();
        let data = file.path().to_str().unwrap();

        assert_eq!(
            resolve(&["stencil", "resolve", "--data", data, "--path", "attributes.secret", "--plain"]),
            Output::Found(Value::from(1i64))
        );
        assert_eq!(
            resolve(&["stencil", "resolve", "--data", data, "--path", "attributes.secret"]),
            Output::Found(Value::from(1i64))
        );
    }

    #[test]
    fn test_policy_listing() {
        let Output::Names(names) = resolve(&["stencil", "policy", "--kind", "record"]) else {
            panic!("expected names");
        };
        assert!(names.contains(&"record\tattributes".to_string()));
        assert!(!names.iter().any(|n| n.ends_with("\tvalidation_error")));
        assert!(names.iter().all(|n| n.starts_with("record\t")));
    }

    #[test]
    fn test_policy_file() {
        let mut policy = NamedTempFile::new().unwrap();
        writeln!(policy, "[record]\nallow = [\"to_json\"]").unwrap();
        let file = data_file();

        let output = resolve(&[
            "stencil",
            "resolve",
            "--data",
            file.path().to_str().unwrap(),
            "--policy",
            policy.path().to_str().unwrap(),
            "--path",
            "to_json",
        ]);
        assert!(matches!(output, Output::Found(Value::Method(_))));
    }

    #[test]
    fn test_missing_data_file() {
        let cli = Cli::try_parse_from(["stencil", "resolve", "--data", "/nonexistent.json", "--path", "a"]).unwrap();
        assert!(execute(cli.command).is_err());
    }
}
