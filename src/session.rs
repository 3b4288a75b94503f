//! Line-oriented terminal front end for the [`Editor`].

use std::path::PathBuf;

use log::debug;

use crate::editor::{Editor, EditorEvent, Notice, NoticeLevel};
use crate::error::EditError;
use crate::model::{Field, StepField};
use crate::presenter::Mode;

pub const HELP: &str = "\
Commands:
  show                      print the recipe
  edit | view | toggle      switch mode
  title <text>              set the title
  servings <text>           set servings verbatim
  servings + | servings -   adjust servings and rescale ingredients
  prep <text> | cook <text> set prep or cook time
  tips <text>               set tips and variations
  ing add                   append an empty ingredient
  ing set <n> <text>        replace ingredient n
  ing rm <n>                remove ingredient n
  step add                  append an empty step
  step title <n> <text>     set the title of step n
  step text <n> <text>      set the text of step n
  step rm <n>               remove step n
  image <path>              use a local image file
  draft <url>               draft a recipe from a video URL
  export                    save the recipe as PDF
  json                      print the recipe as JSON
  help | quit";

/// A parsed terminal command. Indices are zero-based.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Show,
    Edit,
    View,
    Toggle,
    SetField(Field, String),
    AdjustServings(i64),
    AddIngredient,
    SetIngredient(usize, String),
    RemoveIngredient(usize),
    AddStep,
    SetStep(usize, StepField, String),
    RemoveStep(usize),
    Image(PathBuf),
    Draft(String),
    Export,
    Json,
    Help,
    Quit,
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (input, ""),
    }
}

/// Parse a 1-based index as typed by the user.
fn parse_index(word: &str) -> Result<usize, String> {
    match word.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("Expected a position starting at 1, got '{}'", word)),
    }
}

fn usage(command: &str) -> String {
    format!("Unrecognised command '{}'. Type 'help' for a list.", command)
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let (head, rest) = split_word(line.trim());
    let command = match head.to_lowercase().as_str() {
        "show" => Command::Show,
        "edit" => Command::Edit,
        "view" => Command::View,
        "toggle" => Command::Toggle,
        "title" => Command::SetField(Field::Title, rest.to_string()),
        "servings" => match rest {
            "+" => Command::AdjustServings(1),
            "-" => Command::AdjustServings(-1),
            _ => Command::SetField(Field::Servings, rest.to_string()),
        },
        "prep" => Command::SetField(Field::PrepTime, rest.to_string()),
        "cook" => Command::SetField(Field::CookTime, rest.to_string()),
        "tips" => Command::SetField(Field::Tips, rest.to_string()),
        "ing" => {
            let (action, rest) = split_word(rest);
            match action {
                "add" => Command::AddIngredient,
                "set" => {
                    let (n, text) = split_word(rest);
                    Command::SetIngredient(parse_index(n)?, text.to_string())
                }
                "rm" => Command::RemoveIngredient(parse_index(rest.trim())?),
                _ => return Err("Usage: ing add | ing set <n> <text> | ing rm <n>".to_string()),
            }
        }
        "step" => {
            let (action, rest) = split_word(rest);
            match action {
                "add" => Command::AddStep,
                "title" | "text" => {
                    let field = if action == "title" {
                        StepField::Title
                    } else {
                        StepField::Text
                    };
                    let (n, text) = split_word(rest);
                    Command::SetStep(parse_index(n)?, field, text.to_string())
                }
                "rm" => Command::RemoveStep(parse_index(rest.trim())?),
                _ => {
                    return Err(
                        "Usage: step add | step title <n> <text> | step text <n> <text> | step rm <n>"
                            .to_string(),
                    )
                }
            }
        }
        "image" if !rest.is_empty() => Command::Image(PathBuf::from(rest)),
        "image" => return Err("Usage: image <path>".to_string()),
        "draft" => Command::Draft(rest.to_string()),
        "export" => Command::Export,
        "json" => Command::Json,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(usage(head)),
    };
    Ok(command)
}

fn format_notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Info => notice.message.clone(),
        NoticeLevel::Error => format!("error: {}", notice.message),
    }
}

pub struct Session {
    editor: Editor,
    finished: bool,
}

impl Session {
    pub fn new(editor: Editor) -> Self {
        Self {
            editor,
            finished: false,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Run one line of input and return what should be printed.
    pub async fn handle_line(&mut self, line: &str) -> String {
        if line.trim().is_empty() {
            return String::new();
        }
        match parse_command(line) {
            Ok(command) => {
                debug!("Command: {:?}", command);
                self.run(command).await
            }
            Err(message) => message,
        }
    }

    async fn run(&mut self, command: Command) -> String {
        let editor = &mut self.editor;
        let edited: Result<(), EditError> = match command {
            Command::Show => return editor.render(),
            Command::Edit => {
                editor.set_mode(Mode::Edit);
                return editor.render();
            }
            Command::View => {
                editor.set_mode(Mode::View);
                return editor.render();
            }
            Command::Toggle => {
                editor.toggle_mode();
                return editor.render();
            }
            Command::SetField(field, value) => editor.set_field(field, value),
            Command::AdjustServings(delta) => editor.adjust_servings(delta).map(|_| ()),
            Command::AddIngredient => editor.add_ingredient(),
            Command::SetIngredient(index, value) => editor.set_ingredient(index, value),
            Command::RemoveIngredient(index) => editor.remove_ingredient(index),
            Command::AddStep => editor.add_step(),
            Command::SetStep(index, field, value) => editor.set_step_field(index, field, value),
            Command::RemoveStep(index) => editor.remove_step(index),
            Command::Image(path) => editor.replace_image_from_path(&path).await,
            Command::Draft(url) => {
                return if editor.request_draft(&url) {
                    format!("Drafting recipe from {} ...", url.trim())
                } else if editor.is_drafting() {
                    "A draft is already in progress.".to_string()
                } else {
                    "Usage: draft <url>".to_string()
                };
            }
            Command::Export => {
                return if editor.request_export() {
                    "Generating PDF ...".to_string()
                } else {
                    "A PDF is already being generated.".to_string()
                };
            }
            Command::Json => {
                return serde_json::to_string_pretty(editor.document())
                    .unwrap_or_else(|e| format!("error: {}", e));
            }
            Command::Help => return HELP.to_string(),
            Command::Quit => {
                self.finished = true;
                return "Bye.".to_string();
            }
        };

        match edited {
            Ok(()) => editor.render(),
            Err(e) => format!("error: {}", e),
        }
    }

    /// Apply a background completion and return what should be printed.
    pub fn handle_event(&mut self, event: EditorEvent) -> String {
        let drafted = matches!(event, EditorEvent::Drafted(Ok(_)));
        self.editor.apply(event);

        let mut out = Vec::new();
        if let Some(notice) = self.editor.take_notice() {
            out.push(format_notice(&notice));
        }
        if drafted {
            out.push(self.editor.render());
        }
        out.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;
    use crate::export::ExportPipeline;
    use crate::extractors::SimulatedExtractor;
    use std::sync::Arc;
    use std::time::Duration;

    fn session() -> Session {
        let (editor, _rx) = Editor::new(
            ExportPipeline::new(ExportConfig::default()),
            Arc::new(SimulatedExtractor::with_delay(Duration::from_millis(1))),
        );
        Session::new(editor)
    }

    #[test]
    fn test_parse_indices_are_one_based() {
        assert_eq!(
            parse_command("ing set 2 1 cup rice"),
            Ok(Command::SetIngredient(1, "1 cup rice".to_string()))
        );
        assert_eq!(parse_command("step rm 1"), Ok(Command::RemoveStep(0)));
        assert!(parse_command("ing rm 0").is_err());
        assert!(parse_command("ing rm x").is_err());
    }

    #[test]
    fn test_parse_servings() {
        assert_eq!(parse_command("servings +"), Ok(Command::AdjustServings(1)));
        assert_eq!(parse_command("servings -"), Ok(Command::AdjustServings(-1)));
        assert_eq!(
            parse_command("servings 6"),
            Ok(Command::SetField(Field::Servings, "6".to_string()))
        );
    }

    #[test]
    fn test_parse_step_fields() {
        assert_eq!(
            parse_command("step title 3 Toss:"),
            Ok(Command::SetStep(2, StepField::Title, "Toss:".to_string()))
        );
        assert_eq!(
            parse_command("step text 1"),
            Ok(Command::SetStep(0, StepField::Text, String::new()))
        );
    }

    #[test]
    fn test_unknown_command_is_usage() {
        let err = parse_command("frobnicate now").unwrap_err();
        assert!(err.contains("frobnicate"));
        assert!(parse_command("ing").is_err());
        assert!(parse_command("image").is_err());
    }

    #[tokio::test]
    async fn test_edit_requires_edit_mode() {
        let mut session = session();
        let out = session.handle_line("title New").await;
        assert!(out.starts_with("error:"));

        session.handle_line("edit").await;
        assert_eq!(session.editor().mode(), Mode::Edit);
        session.handle_line("title New").await;
        assert_eq!(session.editor().document().title, "New");
    }

    #[tokio::test]
    async fn test_quit_finishes() {
        let mut session = session();
        assert!(!session.is_finished());
        session.handle_line("quit").await;
        assert!(session.is_finished());
    }

    #[tokio::test]
    async fn test_json_output() {
        let mut session = session();
        let out = session.handle_line("json").await;
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["servings"], "4");
        assert_eq!(value["instructions"][0]["step"], 1);
    }

    #[tokio::test]
    async fn test_missing_image_file_is_reported() {
        let mut session = session();
        session.handle_line("edit").await;
        let out = session.handle_line("image /no/such/file.png").await;
        assert!(out.starts_with("error:"), "{}", out);
    }
}
