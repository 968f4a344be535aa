//! Dump command implementation.

use crate::input::InputArgs;
use crate::output;

pub fn run(
    input: &InputArgs,
    credentials_only: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = input.read()?;
    let events = cesr_stream::parse(&content)?;

    for (index, event) in events.iter().enumerate() {
        if credentials_only && !event.is_credential() {
            continue;
        }
        if json {
            println!("{}", serde_json::to_string(event)?);
        } else {
            print!("{}", output::format_event(index, event));
        }
    }

    Ok(())
}
