//! Saída de terminal dos modos informativos — tabela de slots, cálculo de
//! duração e verificação de credenciais.
//!
//! Usa a crate `console` para estilização com cores. Todos os caminhos aqui
//! são somente-leitura: nenhum toca o estado do tracker.

use console::Style;

use crate::jira::{JiraClient, JiraError};
use crate::schedule::{self, SlotName};

/// Imprime a tabela estática dos 4 slots diários.
pub fn show_schedule() {
    let bold = Style::new().bold();
    println!("\n=== Automation Schedule ===");
    println!(
        "{}",
        bold.apply_to(format!(
            "{:<6} {:<14} {:<22} {:<30} {}",
            "Slot", "Target Time", "From Status", "Transition", "Description"
        ))
    );
    println!("{}", "-".repeat(100));
    for slot in schedule::slots() {
        println!(
            "{:<6} {:<14} {:<22} {:<30} {}",
            slot.name.to_string(),
            slot.trigger_time.format("%H:%M:%S").to_string(),
            slot.from_status,
            slot.transition_name,
            slot.description
        );
    }
    println!("===========================\n");
}

/// Imprime a derivação fixa de 8 horas: 4h de manhã + 4h à tarde, almoço
/// nunca contado.
pub fn show_duration() {
    let (morning, afternoon, total) = schedule::working_duration();
    let micros = total.num_microseconds().unwrap_or_default();
    println!("\n=== Duration Calculation ===");
    println!(
        "Working Period 1: {} - {} = {}h",
        slot_time(SlotName::MorningStart),
        slot_time(SlotName::LunchHold),
        morning.num_hours()
    );
    println!(
        "Lunch Break:      {} - {} = 1h (NOT counted)",
        slot_time(SlotName::LunchHold),
        slot_time(SlotName::LunchResume)
    );
    println!(
        "Working Period 2: {} - {} = {}h",
        slot_time(SlotName::LunchResume),
        slot_time(SlotName::EndOfDay),
        afternoon.num_hours()
    );
    println!("Total:            {}h ({micros} microseconds)", total.num_hours());
    println!("============================\n");
}

fn slot_time(name: SlotName) -> String {
    schedule::slot(name).trigger_time.format("%H:%M:%S").to_string()
}

/// Emite uma chamada autenticada leve (`/myself`) e imprime o resultado.
/// Retorna `Ok` com os dados do usuário ou o erro da API para o chamador
/// decidir o código de saída.
pub async fn verify(client: &JiraClient, domain: &str) -> Result<(), JiraError> {
    let green = Style::new().green().bold();
    let red = Style::new().red().bold();

    println!("Verifying Jira credentials...");
    match client.myself().await {
        Ok(user) => {
            println!("\n=== Credential Verification ===");
            println!("Display Name:  {}", user.display_name);
            println!(
                "Email:         {}",
                user.email_address.as_deref().unwrap_or("(hidden)")
            );
            println!("Account ID:    {}", user.account_id);
            println!("Jira Domain:   {domain}");
            println!("================================\n");
            println!("{}", green.apply_to("Credentials verified successfully."));
            Ok(())
        }
        Err(e) => {
            println!(
                "{}",
                red.apply_to(format!(
                    "ERROR: Failed to authenticate ({e}). Check JIRA_EMAIL and JIRA_API_TOKEN."
                ))
            );
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_time_formats_trigger() {
        assert_eq!(slot_time(SlotName::MorningStart), "08:00:00");
        assert_eq!(slot_time(SlotName::EndOfDay), "17:00:00");
    }

    #[tokio::test]
    async fn verify_reports_auth_failure() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/myself"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = JiraClient::new(server.uri(), "me@example.com".into(), "bad".into());
        let err = verify(&client, &server.uri()).await.unwrap_err();
        assert!(matches!(err, JiraError::AuthFailed { status: 403 }));
    }
}
