//! Simple decoder to inspect xAPI statement files.
//!
//! Accepts a single statement, an array of statements, or a statement
//! result page as returned by `GET statements`.

use std::fs;

use serde_json::Value as JsonValue;
use xapi::codec::{decode_statement_result, decode_statements};
use xapi::{validate_statement, Actor, Ifi, Statement, StatementObject};

fn format_actor(actor: &Actor) -> String {
    let ifi = match actor.ifi() {
        Some(Ifi::Mbox(mbox)) => mbox.as_str().to_string(),
        Some(Ifi::MboxSha1Sum(sum)) => format!("sha1:{sum}"),
        Some(Ifi::OpenId(iri)) => iri.to_string(),
        Some(Ifi::Account(account)) => format!("{}@{}", account.name(), account.home_page()),
        None => "(anonymous)".to_string(),
    };
    match (actor, actor.name()) {
        (Actor::Group(group), _) => format!("Group {ifi} [{} members]", group.members().len()),
        (Actor::Agent(_), Some(name)) => format!("{name} <{ifi}>"),
        (Actor::Agent(_), None) => ifi,
    }
}

fn format_object(object: &StatementObject) -> String {
    match object {
        StatementObject::Activity(activity) => {
            let name = activity
                .definition
                .as_ref()
                .and_then(|d| d.name.iter().next().map(|(_, text)| text.to_string()));
            match name {
                Some(name) => format!("Activity {} ({name})", activity.id),
                None => format!("Activity {}", activity.id),
            }
        }
        StatementObject::Agent(agent) => format!("Agent {}", format_actor(&Actor::Agent(agent.clone()))),
        StatementObject::Group(group) => format_actor(&Actor::Group(group.clone())),
        StatementObject::StatementRef(reference) => format!("StatementRef {}", reference.id),
        StatementObject::SubStatement(sub) => format!("SubStatement by {}", format_actor(&sub.actor)),
    }
}

fn load(data: &[u8]) -> (Vec<Statement>, Option<String>) {
    let value: JsonValue = serde_json::from_slice(data).expect("Failed to parse JSON");
    if value.get("statements").is_some() {
        let page = decode_statement_result(&value).expect("Failed to decode statement result");
        (page.statements, page.more)
    } else {
        (decode_statements(&value).expect("Failed to decode statements"), None)
    }
}

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "statements.json".to_string());

    println!("Reading: {}", path);

    let data = fs::read(&path).expect("Failed to read file");
    println!("File size: {} bytes", data.len());

    let (statements, more) = load(&data);

    println!("\n=== Statements ({}) ===", statements.len());
    let mut invalid = 0;
    let mut attachments = 0;
    for (i, statement) in statements.iter().enumerate() {
        let id = statement
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "(no id)".to_string());
        println!("[{}] {}", i, id);
        println!("      actor:  {}", format_actor(&statement.actor));
        let verb = statement.verb.display.iter().next().map(|(_, text)| text.to_string());
        println!("      verb:   {}", verb.unwrap_or_else(|| statement.verb.id.to_string()));
        println!("      object: {}", format_object(&statement.object));
        if let Some(timestamp) = &statement.timestamp {
            println!("      at:     {}", timestamp.to_rfc3339());
        }
        if let Some(score) = statement.result.as_ref().and_then(|r| r.score.as_ref()) {
            println!("      score:  {:?}", score.scaled_value().or(score.raw()));
        }
        attachments += statement.attachments.len();
        if let Err(err) = validate_statement(statement) {
            invalid += 1;
            println!("      INVALID: {}", err);
        }
    }

    println!("\n=== Summary ===");
    println!("  Statements: {}", statements.len());
    println!("  Attachments: {}", attachments);
    println!("  Invalid: {}", invalid);
    if let Some(more) = more {
        println!("  More: {}", more);
    }
}
