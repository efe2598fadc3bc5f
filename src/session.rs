//! Line-oriented interactive front end over [`FormController`].

use crate::console::{drive_report, drive_submit, save_download, Console, ConsoleController};
use crate::render::{DetailNotes, FormScreen, PanelScreen, SchemaTable};
use heart_risk::controller::{
    EventOutcome, FormController, FormState, Key, KeyChord, ModalState, UiEvent,
};
use heart_risk::error::AppError;
use heart_risk::form::{DraftStore, FieldName};
use heart_risk::prediction::PredictionClient;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  set <field> <value>   edit a field (omit the value to clear it)
  blur <field>          validate a single field
  example               load the example patient
  submit                validate and request a prediction
  ctrl+enter, cmd+enter keyboard shortcut for submit
  learn-more            open the prediction details
  close-modal           close the prediction details
  close                 hide the result panel
  report                download the PDF report for the shown result
  reset                 clear the form
  show                  print the form and any result
  schema                list fields and accepted values
  help                  show this help
  quit                  leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionCommand {
    Set { field: FieldName, value: String },
    Event(UiEvent),
    Submit,
    Shortcut(KeyChord),
    Report,
    Show,
    Schema,
    Help,
    Quit,
}

enum Flow {
    Continue,
    Quit,
}

/// Parse one input line; blank lines yield `Ok(None)`.
pub(crate) fn parse_command(line: &str) -> Result<Option<SessionCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "set" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            SessionCommand::Set {
                field: parse_field(field)?,
                value: value.to_string(),
            }
        }
        "blur" => SessionCommand::Event(UiEvent::Blur(parse_field(rest)?)),
        "example" => SessionCommand::Event(UiEvent::LoadExample),
        "submit" => SessionCommand::Submit,
        "ctrl+enter" => SessionCommand::Shortcut(KeyChord {
            ctrl: true,
            meta: false,
            key: Key::Enter,
        }),
        "cmd+enter" => SessionCommand::Shortcut(KeyChord {
            ctrl: false,
            meta: true,
            key: Key::Enter,
        }),
        "enter" => SessionCommand::Shortcut(KeyChord::plain(Key::Enter)),
        "learn-more" => SessionCommand::Event(UiEvent::LearnMore),
        "close-modal" => SessionCommand::Event(UiEvent::CloseModal),
        "close" => SessionCommand::Event(UiEvent::CloseResult),
        "report" => SessionCommand::Report,
        "reset" => SessionCommand::Event(UiEvent::Reset),
        "show" => SessionCommand::Show,
        "schema" => SessionCommand::Schema,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(command))
}

fn parse_field(raw: &str) -> Result<FieldName, String> {
    if raw.is_empty() {
        return Err("a field name is required, see 'schema'".to_string());
    }
    raw.parse::<FieldName>().map_err(|err| err.to_string())
}

pub(crate) async fn run(console: Console) -> Result<(), AppError> {
    let mut controller = console.controller();
    println!("Heart disease risk form (predictor {})", console.predictor_url());
    println!("Type 'help' for commands.");
    print!("{}", FormScreen(&controller.view()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        debug!(?command, "session command");

        match execute(&console, &mut controller, command).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(err) => println!("{err}"),
        }
        for alert in controller.take_alerts() {
            println!("! {alert}");
        }
    }
    Ok(())
}

async fn execute(
    console: &Console,
    controller: &mut ConsoleController,
    command: SessionCommand,
) -> Result<Flow, AppError> {
    match command {
        SessionCommand::Set { field, value } => {
            controller.edit_field(field, value)?;
            let result = controller.blur_field(field)?;
            match result.message {
                Some(message) if !result.valid => println!("{field}: {message}"),
                _ => println!("{field} = {}", controller.values().get(field)),
            }
        }
        SessionCommand::Submit => {
            drive_submit(controller).await?;
            print_submission(controller);
        }
        SessionCommand::Shortcut(chord) => {
            if controller.accepts_shortcut(chord) {
                drive_submit(controller).await?;
                print_submission(controller);
            }
        }
        SessionCommand::Report => {
            // Failures surface through the controller's alerts.
            if let Some(download) = drive_report(controller).await? {
                let path = save_download(console.report_dir(), &download)?;
                println!("Report saved to {}", path.display());
            }
        }
        SessionCommand::Event(event) => {
            let routed = event.clone();
            if let EventOutcome::Validation(result) = controller.handle(event)? {
                match result.message {
                    Some(message) if !result.valid => println!("{message}"),
                    _ => println!("ok"),
                }
                return Ok(Flow::Continue);
            }
            match routed {
                UiEvent::LearnMore => print!("{}", DetailNotes),
                UiEvent::CloseModal => println!("Details closed"),
                UiEvent::LoadExample | UiEvent::Reset | UiEvent::CloseResult => {
                    print!("{}", FormScreen(&controller.view()))
                }
                _ => {}
            }
        }
        SessionCommand::Show => {
            print!("{}", FormScreen(&controller.view()));
            print!("{}", PanelScreen(controller.panel()));
            if controller.modal() == ModalState::Open {
                print!("{}", DetailNotes);
            }
        }
        SessionCommand::Schema => print!("{}", SchemaTable),
        SessionCommand::Help => println!("{HELP}"),
        SessionCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn print_submission<C, S>(controller: &FormController<C, S>)
where
    C: PredictionClient + 'static,
    S: DraftStore + 'static,
{
    match controller.state() {
        FormState::Displaying(_) => print!("{}", PanelScreen(controller.panel())),
        _ => print!("{}", FormScreen(&controller.view())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(line: &str) -> SessionCommand {
        parse_command(line)
            .expect("command parses")
            .expect("command present")
    }

    #[test]
    fn set_takes_rest_of_line_as_value() {
        assert_eq!(
            parsed("set Oldpeak  2.3 "),
            SessionCommand::Set {
                field: FieldName::Oldpeak,
                value: "2.3".to_string()
            }
        );
        assert_eq!(
            parsed("set chol"),
            SessionCommand::Set {
                field: FieldName::Chol,
                value: String::new()
            }
        );
    }

    #[test]
    fn keyboard_shortcuts_map_to_chords() {
        let SessionCommand::Shortcut(chord) = parsed("ctrl+enter") else {
            panic!("expected shortcut");
        };
        assert!(chord.is_submit_shortcut());

        let SessionCommand::Shortcut(chord) = parsed("cmd+enter") else {
            panic!("expected shortcut");
        };
        assert!(chord.meta && chord.is_submit_shortcut());

        let SessionCommand::Shortcut(chord) = parsed("enter") else {
            panic!("expected shortcut");
        };
        assert!(!chord.is_submit_shortcut());
    }

    #[test]
    fn ui_commands_map_to_events() {
        assert_eq!(parsed("example"), SessionCommand::Event(UiEvent::LoadExample));
        assert_eq!(parsed("learn-more"), SessionCommand::Event(UiEvent::LearnMore));
        assert_eq!(parsed("close-modal"), SessionCommand::Event(UiEvent::CloseModal));
        assert_eq!(parsed("close"), SessionCommand::Event(UiEvent::CloseResult));
        assert_eq!(parsed("RESET"), SessionCommand::Event(UiEvent::Reset));
        assert_eq!(
            parsed("blur thal"),
            SessionCommand::Event(UiEvent::Blur(FieldName::Thal))
        );
        assert_eq!(parsed("report"), SessionCommand::Report);
        assert_eq!(parsed("exit"), SessionCommand::Quit);
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse_command("   "), Ok(None));
        match parse_command("predict now") {
            Err(message) => assert!(message.contains("unknown command 'predict'")),
            other => panic!("expected error, got {other:?}"),
        }
        match parse_command("set pulse 80") {
            Err(message) => assert!(message.contains("pulse")),
            other => panic!("expected error, got {other:?}"),
        }
        assert!(parse_command("blur").is_err());
    }
}
