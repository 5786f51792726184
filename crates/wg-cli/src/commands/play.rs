use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;
use wg_explore::SystemClock;

use super::Session;

const HELP: &str = "\
  explore, e       look for the next encounter
  choose <n>, <n>  pick option n
  continue, c      move on after a resolution
  rest, r          rest when tired
  status, s        show director and rewards
  history, h       show recent encounters
  history md|text  print the whole log as markdown or text
  help             show this help
  quit, q          leave";

pub fn run(
    path: &Path,
    location: &str,
    biome: Option<&str>,
    config: Option<&Path>,
) -> Result<(), String> {
    let pack = super::load_pack(path)?;
    let config = super::load_config(config)?;
    let mut session = Session::start(pack, location, biome, config, SystemClock);

    println!("  {} the Wildgrove at {location}", "Exploring".bold());
    println!("  Type 'help' for commands, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let mut words = input.split_whitespace();
        let command = words.next().unwrap_or_default().to_lowercase();

        let outcome: Result<(), String> = match command.as_str() {
            "quit" | "q" => break,
            "help" => {
                println!("{HELP}");
                Ok(())
            }
            "explore" | "e" => session
                .machine
                .begin_exploration()
                .map(super::render_phase)
                .map_err(|e| e.to_string()),
            "choose" => match words.next() {
                Some(n) => choose(&mut session, n),
                None => Err("usage: choose <n>".into()),
            },
            n if n.chars().all(|c| c.is_ascii_digit()) => choose(&mut session, n),
            "continue" | "c" => session
                .machine
                .continue_after_resolution()
                .map(|entry| println!("  {} {}", "Logged:".dimmed(), entry.title))
                .map_err(|e| e.to_string()),
            "rest" | "r" => session
                .machine
                .rest()
                .map(|lines| {
                    println!("  {}", "You rest beneath the ferns.".green());
                    for line in lines {
                        println!("    {}", line.cyan());
                    }
                })
                .map_err(|e| e.to_string()),
            "status" | "s" => {
                session.print_status();
                Ok(())
            }
            "history" | "h" => match words.next() {
                None => {
                    let limit = session.machine.config().history_display_limit;
                    super::render_history(session.machine.history(), limit);
                    Ok(())
                }
                Some("md" | "markdown") => {
                    print!("{}", session.machine.history().export_markdown());
                    Ok(())
                }
                Some("text") => {
                    print!("{}", session.machine.history().export_text());
                    Ok(())
                }
                Some(other) => Err(format!("unknown history format '{other}', try md or text")),
            },
            other => Err(format!("unknown command '{other}', try 'help'")),
        };

        match outcome {
            Ok(()) => println!(),
            Err(e) => println!("  {}\n", e.yellow()),
        }
    }

    Ok(())
}

/// Options are shown from 1.
fn choose(session: &mut Session, n: &str) -> Result<(), String> {
    let n: usize = n.parse().map_err(|_| format!("'{n}' is not a number"))?;
    let index = n
        .checked_sub(1)
        .ok_or_else(|| "options are numbered from 1".to_string())?;
    let summary = session
        .machine
        .choose_option(index)
        .map_err(|e| e.to_string())?;
    super::render_summary(&summary);
    Ok(())
}
