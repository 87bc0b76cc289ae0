use tabled::Table;

use crate::{
    cli::build_session,
    error, info,
    spotify::SpotifyClient,
    types::DeviceTableRow,
};

pub async fn devices() {
    let session = match build_session().await {
        Ok(session) => session,
        Err(e) => error!("Cannot prepare session: {}", e),
    };

    let devices = match session.client().devices().await {
        Ok(devices) => devices,
        Err(e) => error!("Cannot list devices: {}", e),
    };

    if devices.is_empty() {
        info!("No playback device available. Open Spotify on a device first.");
        return;
    }

    let selected = session.selector().select(&devices).map(|d| d.id.clone());
    let rows: Vec<DeviceTableRow> = devices
        .into_iter()
        .map(|d| DeviceTableRow {
            active: match (d.is_active, Some(&d.id) == selected.as_ref()) {
                (true, true) => "yes, target".to_string(),
                (false, true) => "target".to_string(),
                (true, false) => "yes".to_string(),
                (false, false) => String::new(),
            },
            name: d.name,
            kind: d.kind,
            id: d.id,
        })
        .collect();

    println!("{}", Table::new(rows));
}
