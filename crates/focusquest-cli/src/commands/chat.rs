use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use focusquest_core::integrations::chat;
use focusquest_core::storage::Database;
use focusquest_core::{App, ChatClient, ChatError, Config};

use super::{today, CmdResult};

const FAILURE_NOTICE: &str = "the assistant could not answer right now, please try again";

#[derive(Subcommand)]
pub enum ChatAction {
    /// Ask a question, optionally about a text document
    Ask {
        /// Question or instruction
        prompt: String,
        /// Plain-text document to include
        #[arg(long)]
        file: Option<PathBuf>,
        /// Write the reply to this file as well
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Store the API key in the OS keyring (reads stdin when omitted)
    SetKey {
        key: Option<String>,
    },
    /// Remove the stored API key
    ForgetKey,
}

fn read_document(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)?;
    String::from_utf8(bytes)
        .map_err(|_| format!("{} is not a plain-text file", path.display()).into())
}

pub fn run(action: ChatAction) -> CmdResult {
    match action {
        ChatAction::Ask {
            prompt,
            file,
            output,
        } => {
            if prompt.trim().is_empty() {
                return Err(ChatError::EmptyPrompt.into());
            }
            let document = file.as_deref().map(read_document).transpose()?;

            let config = Config::load_or_default();
            let client = ChatClient::from_config(&config.chat)?;
            let db = Database::open()?;
            let mut app = App::load(&db);

            let runtime = tokio::runtime::Runtime::new()?;
            let reply = runtime.block_on(app.ask_chat(
                &client,
                &prompt,
                document.as_deref(),
                today(),
            ));

            match reply {
                Ok(reply) => {
                    println!("{reply}");
                    if let Some(path) = output {
                        std::fs::write(&path, &reply)?;
                        eprintln!("reply saved to {}", path.display());
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "chat request failed");
                    return Err(FAILURE_NOTICE.into());
                }
            }
        }
        ChatAction::SetKey { key } => {
            let key = match key {
                Some(key) => key,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            if key.trim().is_empty() {
                return Err("API key must not be empty".into());
            }
            chat::store_api_key(&key)?;
            println!("ok");
        }
        ChatAction::ForgetKey => {
            chat::forget_api_key()?;
            println!("ok");
        }
    }
    Ok(())
}
