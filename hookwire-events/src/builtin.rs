//! Built-in schemas and sample payloads for every event type

use crate::schema::{FieldKind, FieldSchema};
use crate::tag::EventTag;

fn computer() -> FieldSchema {
    FieldSchema::new()
        .required("udid", FieldKind::String)
        .required("serialNumber", FieldKind::String)
        .required("jssID", FieldKind::Integer)
        .required("deviceName", FieldKind::String)
        .optional("macAddress", FieldKind::String)
        .optional("model", FieldKind::String)
        .optional("osVersion", FieldKind::String)
        .optional("osBuild", FieldKind::String)
        .optional("username", FieldKind::String)
        .optional("ipAddress", FieldKind::String)
        .optional("building", FieldKind::String)
        .optional("department", FieldKind::String)
}

fn mobile_device() -> FieldSchema {
    FieldSchema::new()
        .required("udid", FieldKind::String)
        .required("serialNumber", FieldKind::String)
        .required("jssID", FieldKind::Integer)
        .required("deviceName", FieldKind::String)
        .optional("model", FieldKind::String)
        .optional("modelDisplay", FieldKind::String)
        .optional("osVersion", FieldKind::String)
        .optional("username", FieldKind::String)
        .optional("wifiMacAddress", FieldKind::String)
        .optional("imei", FieldKind::String)
}

fn nested_computer() -> FieldSchema {
    FieldSchema::new()
        .required("computer", FieldKind::Object)
        .required("computer.udid", FieldKind::String)
        .required("computer.serialNumber", FieldKind::String)
        .required("computer.jssID", FieldKind::Integer)
        .optional("computer.deviceName", FieldKind::String)
}

fn jss_lifecycle() -> FieldSchema {
    FieldSchema::new()
        .required("institution", FieldKind::String)
        .required("jssUrl", FieldKind::String)
        .required("hostAddress", FieldKind::String)
        .optional("isClusterMaster", FieldKind::Boolean)
        .optional("webApplicationPath", FieldKind::String)
}

fn smart_group_devices() -> FieldSchema {
    FieldSchema::new()
        .required("name", FieldKind::String)
        .required("jssid", FieldKind::Integer)
        .required("computer", FieldKind::Boolean)
        .required("groupAddedDevicesIds", FieldKind::Array)
        .required("groupRemovedDevicesIds", FieldKind::Array)
        .optional("smartGroup", FieldKind::Boolean)
        .optional("groupAddedDevices", FieldKind::Array)
        .optional("groupRemovedDevices", FieldKind::Array)
}

/// Built-in schema for a tag
pub fn schema_for(tag: EventTag) -> FieldSchema {
    match tag {
        EventTag::ComputerAdded
        | EventTag::ComputerInventoryCompleted
        | EventTag::ComputerPushCapabilityChanged => computer(),
        EventTag::ComputerCheckIn => nested_computer()
            .optional("trigger", FieldKind::String)
            .optional("username", FieldKind::String),
        EventTag::ComputerPolicyFinished => nested_computer()
            .required("policyId", FieldKind::Integer)
            .required("successful", FieldKind::Boolean),
        EventTag::DeviceAddedToDep => FieldSchema::new()
            .required("serialNumber", FieldKind::String)
            .required("deviceEnrollmentProgramInstanceId", FieldKind::Integer)
            .optional("assetTag", FieldKind::String)
            .optional("model", FieldKind::String)
            .optional("description", FieldKind::String)
            .optional("deviceAssignedDate", FieldKind::Any),
        EventTag::JssShutdown | EventTag::JssStartup => jss_lifecycle(),
        EventTag::MobileDeviceCheckIn
        | EventTag::MobileDeviceCommandCompleted
        | EventTag::MobileDeviceEnrolled
        | EventTag::MobileDevicePushSent
        | EventTag::MobileDeviceUnEnrolled => mobile_device(),
        EventTag::PatchSoftwareTitleUpdated => FieldSchema::new()
            .required("jssID", FieldKind::Integer)
            .required("name", FieldKind::String)
            .required("latestVersion", FieldKind::String)
            .optional("lastUpdate", FieldKind::Integer)
            .optional("reportUrl", FieldKind::String),
        EventTag::PushSent => FieldSchema::new()
            .required("type", FieldKind::String)
            .required("managementId", FieldKind::Any),
        EventTag::RestApiOperation => FieldSchema::new()
            .required("authorizedUsername", FieldKind::String)
            .required("objectTypeName", FieldKind::String)
            .required("restAPIOperationType", FieldKind::String)
            .required("operationSuccessful", FieldKind::Boolean)
            .optional("objectID", FieldKind::Integer)
            .optional("objectName", FieldKind::String),
        EventTag::ScepChallenge => FieldSchema::new()
            .required("entityType", FieldKind::String)
            .optional("managementId", FieldKind::Any)
            .optional("targetDevice", FieldKind::Object),
        EventTag::SmartGroupComputerMembershipChange
        | EventTag::SmartGroupMobileDeviceMembershipChange => smart_group_devices(),
        EventTag::SmartGroupUserMembershipChange => FieldSchema::new()
            .required("name", FieldKind::String)
            .required("jssid", FieldKind::Integer)
            .required("groupAddedUserIds", FieldKind::Array)
            .required("groupRemovedUserIds", FieldKind::Array)
            .optional("smartGroup", FieldKind::Boolean),
    }
}

/// Sample payload shipped with the crate for a tag
pub fn sample_for(tag: EventTag) -> &'static str {
    match tag {
        EventTag::ComputerAdded => include_str!("../fixtures/ComputerAdded.json"),
        EventTag::ComputerCheckIn => include_str!("../fixtures/ComputerCheckIn.json"),
        EventTag::ComputerInventoryCompleted => {
            include_str!("../fixtures/ComputerInventoryCompleted.json")
        }
        EventTag::ComputerPolicyFinished => include_str!("../fixtures/ComputerPolicyFinished.json"),
        EventTag::ComputerPushCapabilityChanged => {
            include_str!("../fixtures/ComputerPushCapabilityChanged.json")
        }
        EventTag::DeviceAddedToDep => include_str!("../fixtures/DeviceAddedToDEP.json"),
        EventTag::JssShutdown => include_str!("../fixtures/JSSShutdown.json"),
        EventTag::JssStartup => include_str!("../fixtures/JSSStartup.json"),
        EventTag::MobileDeviceCheckIn => include_str!("../fixtures/MobileDeviceCheckIn.json"),
        EventTag::MobileDeviceCommandCompleted => {
            include_str!("../fixtures/MobileDeviceCommandCompleted.json")
        }
        EventTag::MobileDeviceEnrolled => include_str!("../fixtures/MobileDeviceEnrolled.json"),
        EventTag::MobileDevicePushSent => include_str!("../fixtures/MobileDevicePushSent.json"),
        EventTag::MobileDeviceUnEnrolled => include_str!("../fixtures/MobileDeviceUnEnrolled.json"),
        EventTag::PatchSoftwareTitleUpdated => {
            include_str!("../fixtures/PatchSoftwareTitleUpdated.json")
        }
        EventTag::PushSent => include_str!("../fixtures/PushSent.json"),
        EventTag::RestApiOperation => include_str!("../fixtures/RestAPIOperation.json"),
        EventTag::ScepChallenge => include_str!("../fixtures/SCEPChallenge.json"),
        EventTag::SmartGroupComputerMembershipChange => {
            include_str!("../fixtures/SmartGroupComputerMembershipChange.json")
        }
        EventTag::SmartGroupMobileDeviceMembershipChange => {
            include_str!("../fixtures/SmartGroupMobileDeviceMembershipChange.json")
        }
        EventTag::SmartGroupUserMembershipChange => {
            include_str!("../fixtures/SmartGroupUserMembershipChange.json")
        }
    }
}
