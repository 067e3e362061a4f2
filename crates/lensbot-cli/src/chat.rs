//! Interactive classification loop.

use std::io::{self, BufRead, Write};

use lensbot_ai::Model;

use crate::replies::ReplyBook;

/// Read messages from stdin, classify each one, and answer with a canned
/// reply. Empty input is bounced back without touching the model.
pub fn run(model: &Model) -> anyhow::Result<()> {
    let replies = ReplyBook::default();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("lensbot ready — type a message, Ctrl-D to quit");
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let message = line.trim();
        if message.is_empty() {
            println!("(type a message first)");
            continue;
        }

        let prediction = model.predict(message)?;
        println!(
            "[{} {:.3}] {}",
            prediction.intent,
            prediction.score,
            replies.pick(&prediction.intent)
        );
    }
    Ok(())
}
