use const_format::formatcp;

// Naming constants

/// DN of the root organization.
pub const ORG_ROOT: &str = "org-root";

/// Relative name prefix of a boot policy, followed by the policy name.
pub const BOOT_POLICY_RN_PREFIX: &str = "boot-policy-";

/// Relative name of the storage umbrella under a boot policy.
pub const STORAGE_RN: &str = "storage";

/// Relative name of the local storage umbrella under the storage umbrella.
pub const LOCAL_STORAGE_RN: &str = "local-storage";

/// Relative name of the LAN umbrella.
pub const LAN_RN: &str = "lan";

/// Relative name of the iSCSI umbrella.
pub const ISCSI_RN: &str = "iscsi";

/// Relative name of the SAN umbrella.
pub const SAN_RN: &str = "san";

/// Relative name prefix of a SAN image, followed by its type.
pub const SAN_IMAGE_RN_PREFIX: &str = "sanimg-";

/// Relative name prefix of image paths (LAN, iSCSI and SAN targets), followed
/// by their type.
pub const PATH_RN_PREFIX: &str = "path-";

/// Relative name prefix of local LUN image paths, followed by their type.
pub const LOCAL_LUN_PATH_RN_PREFIX: &str = "lun-";

/// Relative name prefix of disk image paths (JBOD and embedded disk),
/// followed by their type.
pub const DISK_PATH_RN_PREFIX: &str = "disk-";

/// Relative name prefix of a virtual media device, followed by its access.
pub const VMEDIA_RN_PREFIX: &str = "vm-";

/// Relative name of the boot security node.
pub const BOOT_SECURITY_RN: &str = "boot-security";

/// Protocol used by LAN boot devices.
pub const LAN_PROTOCOL: &str = "pxe";

// Device order bounds

/// Lowest order a boot device can take.
pub const MIN_DEVICE_ORDER: u32 = 1;

/// Highest order a boot device can take.
pub const MAX_DEVICE_ORDER: u32 = 16;

// Attribute names

pub mod attr {
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "descr";
    pub const ORDER: &str = "order";
    pub const TYPE: &str = "type";
    pub const ACCESS: &str = "access";
    pub const LUN_NAME: &str = "lun_name";
    pub const SLOT_NUMBER: &str = "slot_number";
    pub const VNIC_NAME: &str = "vnic_name";
    pub const ISCSI_VNIC_NAME: &str = "i_scsi_vnic_name";
    pub const PROTOCOL: &str = "prot";
    pub const WWN: &str = "wwn";
    pub const LUN: &str = "lun";
    pub const BOOT_MODE: &str = "boot_mode";
    pub const REBOOT_ON_UPDATE: &str = "reboot_on_update";
    pub const ENFORCE_VNIC_NAME: &str = "enforce_vnic_name";
    pub const POLICY_OWNER: &str = "policy_owner";
    pub const SECURE_BOOT: &str = "secure_boot";
}

// CLI defaults

/// Default directory for ucsmkit configuration.
pub const UCSMKIT_CONFIG_DIRECTORY: &str = "/etc/ucsmkit";

/// Default path of the CLI configuration file.
pub const UCSMKIT_CONFIG_PATH_DEFAULT: &str = formatcp!("{UCSMKIT_CONFIG_DIRECTORY}/config.yaml");

/// Default directory for ucsmkit state.
pub const UCSMKIT_STATE_DIRECTORY: &str = "/var/lib/ucsmkit";

/// Default path of the persisted object store.
pub const UCSMKIT_STORE_PATH_DEFAULT: &str = formatcp!("{UCSMKIT_STATE_DIRECTORY}/store.yaml");
