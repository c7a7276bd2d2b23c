//! Cross-family rules, checked over the whole device list before any tree is
//! built.

use std::collections::BTreeSet;

use log::trace;

use crate::config::BootDevice;

use super::{error::BootOrderError, types::DeviceKind};

/// Rejects device lists whose combinations are not admissible in a single
/// policy:
///
/// - `local_disk` together with any other local device.
/// - `cd_dvd` together with `cd_dvd_local` or `cd_dvd_remote`.
/// - `floppy` together with `floppy_local` or `floppy_remote`.
///
/// Unknown device names are ignored here; they are reported when the tree is
/// composed.
pub fn check_device_combinations(devices: &[BootDevice]) -> Result<(), BootOrderError> {
    let present: BTreeSet<DeviceKind> = devices
        .iter()
        .filter_map(|d| d.device_name.parse::<DeviceKind>().ok())
        .collect();
    trace!("Checking device combinations of {:?}", present);

    if present.contains(&DeviceKind::LocalDisk) && present.iter().any(|k| k.is_other_local()) {
        return Err(BootOrderError::LocalDiskWithOtherLocal);
    }

    if present.contains(&DeviceKind::CdDvd)
        && (present.contains(&DeviceKind::CdDvdLocal) || present.contains(&DeviceKind::CdDvdRemote))
    {
        return Err(BootOrderError::CdDvdConflict);
    }

    if present.contains(&DeviceKind::Floppy)
        && (present.contains(&DeviceKind::FloppyLocal)
            || present.contains(&DeviceKind::FloppyRemote))
    {
        return Err(BootOrderError::FloppyConflict);
    }

    Ok(())
}
