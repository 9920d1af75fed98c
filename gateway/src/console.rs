use anyhow::Result;
use assistant_core::{Intent, Registry, Router};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const WELCOME_BANNER: &str = "
╔══════════════════════════════════════════════╗
║       Welcome to the AI Assistant!           ║
╠══════════════════════════════════════════════╣
║ You can ask questions, perform calculations, ║
║ convert currencies, or check the weather.    ║
║                                              ║
║ Examples:                                    ║
║ • Who was Albert Einstein?                   ║
║ • What is 128 * 46?                          ║
║ • Weather in New York                        ║
║ • Convert 100 USD to BRL                     ║
╠══════════════════════════════════════════════╣
║ Type 'exit', 'quit', or 'sair' to leave.     ║
╚══════════════════════════════════════════════╝
";

fn is_exit(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "exit" | "quit" | "sair")
}

/// Read-print loop: one input is fully answered before the next is read.
pub async fn run(router: &Router, registry: &Registry) -> Result<()> {
    println!("{WELCOME_BANNER}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!("\nExiting.");
            break;
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if is_exit(input) {
            break;
        }

        // Classify first so the user sees which tool is about to run
        let classified = Intent::classify(input);
        let source = match &classified {
            Ok(intent) => intent.source(),
            Err(rejection) => rejection.source,
        };
        debug!(source = %source.name(), "Classified input");
        println!("{}", registry.announcement(source));

        let reply = router.handle(input, classified).await;
        println!("{}", reply.render());
    }

    Ok(())
}
