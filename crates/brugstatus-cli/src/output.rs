use brugstatus_core::interpret::StatusResult;
use brugstatus_core::types::BridgeStatus;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Literal-text rendering: status line, last-observed line, source line.
pub fn print_text(result: &StatusResult) {
    match result.status {
        BridgeStatus::Undetermined => {
            println!(
                "De status van de {} kon niet bepaald worden. \
                 Pas de dataset-instellingen aan of controleer handmatig.",
                result.bridge
            );
        }
        status => {
            println!(
                "De {} is {}. ({})",
                result.bridge,
                status.label_nl(),
                result.summary
            );
        }
    }
    let observed = result
        .observed_at
        .map(|at| at.to_rfc3339())
        .unwrap_or_else(|| "onbekend".to_string());
    println!("Laatste melding: {observed}");
    println!("Bron: {}", result.source_url);
}
