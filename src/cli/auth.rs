use chrono::{DateTime, Local};

use crate::{error, spotify::Authenticator, success};

pub async fn auth(authenticator: &Authenticator, force: bool) {
    let result = if force {
        authenticator.login().await
    } else {
        authenticator.get_valid_token().await
    };

    if let Err(e) = result {
        error!("Authorization failed: {}", e);
    }

    match authenticator.cached_record().await {
        Some(record) => success!(
            "Authorized. Access token valid until {}",
            format_timestamp(record.expires_at)
        ),
        None => success!("Authorized."),
    }
}

pub async fn logout(authenticator: &Authenticator) {
    if let Err(e) = authenticator.logout().await {
        error!("Cannot remove token cache. Err: {}", e);
    }

    success!(
        "Removed cached token at {}",
        authenticator.config().cache_path.display()
    );
}

fn format_timestamp(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
