use anyhow::Context;
use clisig::{cli, App};
use std::process::ExitCode;

/// The entry-point signature the CLI is derived from
const SIGNATURE: &str = r#"
    """
    Greet one or more people from the command line.
    """
    name: str,  # Name of the person to greet
    count: int = 1,  # Number of times to repeat the greeting
    shout: bool,  # Print the greeting in capital letters
"#;

fn main() -> ExitCode {
    let app = match App::from_signature("greet", SIGNATURE) {
        Ok(app) => app.with_version(clisig::VERSION),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    cli::run(app, |args| {
        let name: String = args.get("name").context("missing name")?;
        let count: i64 = args.get("count").context("missing count")?;
        let shout: bool = args.get("shout").context("missing shout")?;

        let mut greeting = format!("Hello, {}!", name);
        if shout {
            greeting = greeting.to_uppercase();
        }
        for _ in 0..count {
            println!("{}", greeting);
        }
        Ok(())
    })
}
