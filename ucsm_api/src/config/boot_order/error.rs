use serde::{Deserialize, Serialize};

use crate::config::ImageType;

/// Rule violations found while composing a boot order.
///
/// The messages are part of the public contract: callers match on them.
#[derive(thiserror::Error, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BootOrderError {
    #[error("local_disk cannot be added with other local devices.")]
    LocalDiskWithOtherLocal,

    #[error("Either 'cd_dvd' or 'cd_dvd_local, cd_dvd_remote' can be added.")]
    CdDvdConflict,

    #[error("Either 'floppy' or 'floppy_local, floppy_remote' can be added.")]
    FloppyConflict,

    #[error(
        "Invalid order '{order}' for device '{device}', supported range is {min} to {max}"
    )]
    InvalidOrder {
        device: String,
        order: String,
        min: u32,
        max: u32,
    },

    #[error("Device '{device}' already exist at order '{order}'")]
    DevicePresent { device: String, order: String },

    #[error("Instance of {device} already added at order '{order}'")]
    UmbrellaPresent { device: String, order: String },

    #[error("Both instance of {device} already added.")]
    BothImagesPresent { device: String },

    #[error("Instance of {device} of type '{image_type}' already added at  order '{order}'.")]
    ImageTypePresent {
        device: String,
        image_type: ImageType,
        order: String,
    },

    #[error("Both instances of {device} are already added.")]
    BothPathsPresent { device: String },

    #[error("Instance of San device is already added.")]
    SanPresent,

    #[error("Instance of '{image_type}' san image is already added.")]
    SanImagePresent { image_type: ImageType },

    #[error("Both instance of SAN target devices are already added.")]
    SanTargetsFull,

    #[error("Instance of SAN target type '{target_type}' is already added.")]
    SanTargetPresent { target_type: ImageType },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            BootOrderError::UmbrellaPresent {
                device: "Local Lun".into(),
                order: "1".into()
            }
            .to_string(),
            "Instance of Local Lun already added at order '1'"
        );
        assert_eq!(
            BootOrderError::ImageTypePresent {
                device: "Local Lun".into(),
                image_type: ImageType::Primary,
                order: "1".into()
            }
            .to_string(),
            "Instance of Local Lun of type 'primary' already added at  order '1'."
        );
        assert_eq!(
            BootOrderError::DevicePresent {
                device: "sdcard".into(),
                order: "1".into()
            }
            .to_string(),
            "Device 'sdcard' already exist at order '1'"
        );
        assert_eq!(
            BootOrderError::SanTargetPresent {
                target_type: ImageType::Secondary
            }
            .to_string(),
            "Instance of SAN target type 'secondary' is already added."
        );
    }
}
