use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use caduceus_application::{PrivilegeRepository, PrivilegeResolver, ResolveError};
use caduceus_core::{AppError, AppResult};
use caduceus_domain::{EffectivePrivileges, identifier};
use caduceus_infrastructure::{
    InMemoryPrivilegeRepository, PostgresPrivilegeRepository, RestPrivilegeRepository,
};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::console_config::{PrivilegeStoreConfig, RestStoreConfig};
use crate::seed::PrivilegeSeed;

/// Outcome of a console command that can fail without being an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub output: String,
    pub success: bool,
}

pub fn validate_report(raw: &str) -> Report {
    match identifier::validate(raw) {
        Ok(classification) => Report {
            output: format!(
                "valid: {} ({} · {})",
                raw, classification.category.name, classification.subtype.name
            ),
            success: true,
        },
        Err(error) => {
            let kind = if error.is_unknown_classification() {
                "unsupported classification"
            } else {
                "malformed identifier"
            };
            Report {
                output: format!("invalid [{}] {kind}: {error}", error.reason_code()),
                success: false,
            }
        }
    }
}

pub fn categories_report() -> String {
    let mut output = String::new();
    for category in identifier::categories() {
        let _ = writeln!(output, "{}  {}", category.code, category.name);
        for entry in category.types() {
            let _ = writeln!(
                output,
                "   {}  {:<22} {}  e.g. {}",
                entry.code,
                entry.name,
                entry.description,
                identifier::placeholder(category.code, entry.code)
            );
        }
    }
    output
}

pub fn resolve_failure_message(error: &ResolveError) -> String {
    match error {
        ResolveError::AssignmentLookup { principal_id, source } => format!(
            "could not determine access for '{principal_id}': role assignments are unavailable ({source})"
        ),
        ResolveError::RoleLookup { principal_id, source } => format!(
            "could not determine access for '{principal_id}': role definitions are unavailable ({source})"
        ),
    }
}

pub async fn build_repository(
    store: &PrivilegeStoreConfig,
) -> AppResult<Arc<dyn PrivilegeRepository>> {
    match store {
        PrivilegeStoreConfig::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = PgPoolOptions::new()
                .max_connections(*max_connections)
                .acquire_timeout(Duration::from_secs(10))
                .connect(database_url.as_str())
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to connect to privilege database: {error}"))
                })?;
            info!("using postgres privilege store");
            Ok(Arc::new(PostgresPrivilegeRepository::new(pool)))
        }
        PrivilegeStoreConfig::Rest(RestStoreConfig {
            base_url,
            api_key,
            timeout,
        }) => {
            let http_client = reqwest::Client::builder()
                .timeout(*timeout)
                .build()
                .map_err(|error| {
                    AppError::Internal(format!("failed to build HTTP client: {error}"))
                })?;
            info!(base_url = %base_url, "using REST privilege store");
            Ok(Arc::new(RestPrivilegeRepository::new(
                http_client,
                base_url.clone(),
                api_key.clone(),
            )))
        }
        PrivilegeStoreConfig::Memory { seed_file } => {
            let repository = InMemoryPrivilegeRepository::new();
            match seed_file {
                Some(path) => PrivilegeSeed::read(path)?.load_into(&repository).await?,
                None => {
                    warn!("in-memory privilege store has no seed; every principal resolves empty")
                }
            }
            Ok(Arc::new(repository))
        }
    }
}

pub async fn resolve_report(
    resolver: &PrivilegeResolver,
    principal_id: &str,
) -> AppResult<Report> {
    if let Err(error) = identifier::validate(principal_id) {
        warn!(principal_id, reason = error.reason_code(), "principal identifier does not validate");
    }

    match resolver.resolve(principal_id).await {
        Ok(snapshot) => Ok(Report {
            output: render_snapshot(&snapshot)?,
            success: true,
        }),
        Err(error) => Ok(Report {
            output: resolve_failure_message(&error),
            success: false,
        }),
    }
}

#[derive(Serialize)]
struct SnapshotView<'a> {
    primary_role: &'a str,
    snapshot: &'a EffectivePrivileges,
}

fn render_snapshot(snapshot: &EffectivePrivileges) -> AppResult<String> {
    let view = SnapshotView {
        primary_role: snapshot.primary_role_label(),
        snapshot,
    };
    serde_json::to_string_pretty(&view)
        .map_err(|error| AppError::Internal(format!("failed to render privileges: {error}")))
}
