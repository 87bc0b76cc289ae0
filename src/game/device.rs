use crate::{
    game::RoundError,
    spotify::SpotifyClient,
    types::Device,
};

/// Policy that picks the playback target out of the available devices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeviceSelector {
    /// The first device Spotify lists.
    #[default]
    FirstListed,
    /// The device Spotify reports as active, falling back to the first one.
    ActiveFirst,
    /// A specific device, matched by name or id, ignoring case.
    Named(String),
}

impl DeviceSelector {
    pub fn select<'a>(&self, devices: &'a [Device]) -> Option<&'a Device> {
        match self {
            DeviceSelector::FirstListed => devices.first(),
            DeviceSelector::ActiveFirst => devices
                .iter()
                .find(|d| d.is_active)
                .or_else(|| devices.first()),
            DeviceSelector::Named(wanted) => devices
                .iter()
                .find(|d| d.name.eq_ignore_ascii_case(wanted) || d.id.eq_ignore_ascii_case(wanted)),
        }
    }
}

/// Lists the devices and picks the target. The list is fetched fresh on every
/// call since devices come and go at any time.
///
/// # Errors
///
/// [`RoundError::Api`] when listing fails, [`RoundError::NoDevice`] when the list
/// is empty or the selector matches nothing.
pub async fn resolve_device<C: SpotifyClient>(
    client: &C,
    selector: &DeviceSelector,
) -> Result<Device, RoundError> {
    let devices = client.devices().await?;
    selector
        .select(&devices)
        .cloned()
        .ok_or(RoundError::NoDevice)
}
