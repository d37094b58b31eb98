//! Settings database operations
//!
//! Two singleton rows in `system_settings`, each a JSON blob decoded through
//! the typed SettingValue union. Missing rows fall back to defaults so a
//! fresh database behaves sensibly before anything is configured.

use markcheck_common::settings::{CameraRoster, SettingValue, KEY_CAMERA_CONFIG, KEY_THRESHOLDS};
use markcheck_common::verdict::Thresholds;
use markcheck_common::Result;
use sqlx::SqlitePool;

/// Load the detection thresholds, defaulting when unset
pub async fn load_thresholds(pool: &SqlitePool) -> Result<Thresholds> {
    match get_setting_json(pool, KEY_THRESHOLDS).await? {
        Some(json) => SettingValue::decode(KEY_THRESHOLDS, &json)?.into_thresholds(),
        None => Ok(Thresholds::default()),
    }
}

/// Store the detection thresholds (caller validates first)
pub async fn store_thresholds(pool: &SqlitePool, thresholds: &Thresholds) -> Result<()> {
    set_setting(pool, &SettingValue::Thresholds(*thresholds)).await
}

/// Load the camera roster, defaulting when unset
pub async fn load_cameras(pool: &SqlitePool) -> Result<CameraRoster> {
    match get_setting_json(pool, KEY_CAMERA_CONFIG).await? {
        Some(json) => SettingValue::decode(KEY_CAMERA_CONFIG, &json)?.into_cameras(),
        None => Ok(CameraRoster::default()),
    }
}

/// Store the camera roster (caller validates first)
pub async fn store_cameras(pool: &SqlitePool, roster: &CameraRoster) -> Result<()> {
    set_setting(pool, &SettingValue::CameraConfig(roster.clone())).await
}

async fn get_setting_json(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT setting_value FROM system_settings WHERE setting_key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;

    Ok(row.map(|(value,)| value))
}

async fn set_setting(pool: &SqlitePool, value: &SettingValue) -> Result<()> {
    sqlx::query(
        "INSERT INTO system_settings (setting_key, setting_value) VALUES (?, ?)
         ON CONFLICT(setting_key) DO UPDATE SET
             setting_value = excluded.setting_value,
             updated_at = CURRENT_TIMESTAMP",
    )
    .bind(value.key())
    .bind(value.encode()?)
    .execute(pool)
    .await?;

    Ok(())
}
