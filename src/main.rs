use clap::Parser;
use lezzet_booking::core::{ConfigProvider, StatusKind};
use lezzet_booking::utils::error::ErrorSeverity;
use lezzet_booking::utils::logger::{self, LogFormat};
use lezzet_booking::utils::validation::{validate_draft_fields, Validate};
use lezzet_booking::{
    BookingError, CliConfig, ReservationWorkflow, SubmissionStatus, SubmitAttempt, WebhookGateway,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(LogFormat::from_flag(cli.json_logs), cli.verbose);

    tracing::info!("Starting lezzet-booking CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證配置
    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => exit_with_error(&e),
    };

    let gateway = WebhookGateway::from_config(&config);
    tracing::info!("📡 Booking endpoint: {}", gateway.endpoint());
    let workflow = ReservationWorkflow::with_messages(gateway, config.messages());

    for (field, value) in cli.field_inputs() {
        workflow.set_field(field, value);
    }

    // 必填與選項檢查屬於畫面層
    if !cli.skip_checks {
        if let Err(e) = validate_draft_fields(&workflow.draft()) {
            exit_with_error(&e);
        }
    }

    // 橫幅跟著狀態變化更新，直到請求結束
    let mut updates = workflow.subscribe();
    let banner = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let status = updates.borrow_and_update().clone();
            print_banner(&status);
            if !status.is_in_flight() {
                break;
            }
        }
    });

    let attempt = workflow.submit().await;
    banner.await?;

    match attempt {
        SubmitAttempt::Settled(status) if status.kind() == StatusKind::Failed => {
            std::process::exit(2);
        }
        SubmitAttempt::Settled(_) => {}
        SubmitAttempt::Ignored => {
            tracing::warn!("Submit ignored: a reservation request is already in flight");
        }
    }

    Ok(())
}

fn print_banner(status: &SubmissionStatus) {
    let message = status.message().unwrap_or_default();
    match status.kind() {
        StatusKind::InFlight => println!("⏳ Gönderiliyor..."),
        StatusKind::Succeeded => println!("✅ {}", message),
        StatusKind::Failed => eprintln!("❌ {}", message),
        StatusKind::Idle => {}
    }
}

fn exit_with_error(e: &BookingError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 64,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
