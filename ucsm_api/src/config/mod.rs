//! Caller-facing configuration types: boot device lists and boot policy
//! properties.

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::attr;

pub mod boot_order;

/// Distinguishes the two entries a family umbrella can hold.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageType {
    Primary,
    Secondary,
}

impl ImageType {
    /// Returns the other image type.
    pub fn other(self) -> Self {
        match self {
            Self::Primary => Self::Secondary,
            Self::Secondary => Self::Primary,
        }
    }
}

/// Firmware boot mode of a boot policy.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Copy,
    Clone,
    Default,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BootMode {
    #[default]
    Legacy,
    Uefi,
}

/// The backend's boolean.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

/// One entry of a boot device list.
///
/// `device_name` is kept as a string so that an unknown name is reported by
/// the composer rather than by the parser. The optional fields are only
/// meaningful for some device families; unknown keys are rejected.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BootDevice {
    pub device_name: String,

    #[serde(deserialize_with = "deserialize_order")]
    pub device_order: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lun_name: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<ImageType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vnic_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wwn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lun: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<ImageType>,
}

impl BootDevice {
    pub fn new(device_name: impl Into<String>, device_order: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            device_order: device_order.into(),
            ..Default::default()
        }
    }

    pub fn with_lun_name(self, lun_name: impl Into<String>) -> Self {
        Self {
            lun_name: Some(lun_name.into()),
            ..self
        }
    }

    pub fn with_type(self, image_type: ImageType) -> Self {
        Self {
            image_type: Some(image_type),
            ..self
        }
    }

    pub fn with_slot_number(self, slot_number: impl Into<String>) -> Self {
        Self {
            slot_number: Some(slot_number.into()),
            ..self
        }
    }

    pub fn with_vnic_name(self, vnic_name: impl Into<String>) -> Self {
        Self {
            vnic_name: Some(vnic_name.into()),
            ..self
        }
    }

    /// Sets all three SAN target fields.
    pub fn with_target(
        self,
        wwn: impl Into<String>,
        lun: impl Into<String>,
        target_type: ImageType,
    ) -> Self {
        Self {
            wwn: Some(wwn.into()),
            lun: Some(lun.into()),
            target_type: Some(target_type),
            ..self
        }
    }
}

/// Accepts the order either as a YAML string or as an integer.
fn deserialize_order<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Order {
        Number(u64),
        Text(String),
    }

    Ok(match Order::deserialize(deserializer)? {
        Order::Number(n) => n.to_string(),
        Order::Text(s) => s,
    })
}

/// Overridable properties of a boot policy. Fields left as `None` are not
/// sent to the backend.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BootPolicyProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reboot_on_update: Option<YesNo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce_vnic_name: Option<YesNo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot_mode: Option<BootMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BootPolicyProps {
    /// Returns the supplied properties as backend attribute pairs.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attributes = Vec::new();
        if let Some(v) = self.reboot_on_update {
            attributes.push((attr::REBOOT_ON_UPDATE, v.to_string()));
        }
        if let Some(v) = self.enforce_vnic_name {
            attributes.push((attr::ENFORCE_VNIC_NAME, v.to_string()));
        }
        if let Some(v) = self.boot_mode {
            attributes.push((attr::BOOT_MODE, v.to_string()));
        }
        if let Some(v) = &self.policy_owner {
            attributes.push((attr::POLICY_OWNER, v.clone()));
        }
        if let Some(v) = &self.description {
            attributes.push((attr::DESCRIPTION, v.clone()));
        }
        attributes
    }

    /// Fills every unset property with the value a new policy gets.
    pub fn with_creation_defaults(self) -> Self {
        Self {
            reboot_on_update: self.reboot_on_update.or(Some(YesNo::No)),
            enforce_vnic_name: self.enforce_vnic_name.or(Some(YesNo::Yes)),
            boot_mode: self.boot_mode.or(Some(BootMode::Legacy)),
            policy_owner: self.policy_owner.or_else(|| Some("local".into())),
            description: self.description.or_else(|| Some(String::new())),
        }
    }
}
