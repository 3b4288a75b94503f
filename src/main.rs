use env_logger::Env;
use log::info;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

use recipe_printer::session::Session;
use recipe_printer::{Editor, RecipeError, Settings};

async fn print(stdout: &mut io::Stdout, text: &str) -> Result<(), RecipeError> {
    if !text.is_empty() {
        stdout.write_all(text.as_bytes()).await?;
        if !text.ends_with('\n') {
            stdout.write_all(b"\n").await?;
        }
    }
    stdout.write_all(b"> ").await?;
    stdout.flush().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), RecipeError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = Settings::load()?;
    info!("Writing PDFs to {}", settings.export.output_dir.display());

    let (editor, mut events) = Editor::from_settings(&settings);
    let mut session = Session::new(editor);
    let mut stdout = io::stdout();
    let mut lines = BufReader::new(io::stdin()).lines();

    let intro = format!("{}\nType 'help' for commands.", session.editor().render());
    print(&mut stdout, &intro).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let output = session.handle_line(&line).await;
                if session.is_finished() {
                    stdout.write_all(format!("{}\n", output).as_bytes()).await?;
                    break;
                }
                print(&mut stdout, &output).await?;
            }
            Some(event) = events.recv() => {
                let output = session.handle_event(event);
                print(&mut stdout, &format!("\n{}", output)).await?;
            }
        }
    }

    Ok(())
}
