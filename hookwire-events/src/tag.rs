//! Event type tags

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Identifier of a webhook event type.
///
/// The set is closed: it mirrors the event names the management platform
/// sends in `webhook.webhookEvent`, and the names round-trip exactly through
/// [`EventTag::as_str`] and [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventTag {
    ComputerAdded,
    ComputerCheckIn,
    ComputerInventoryCompleted,
    ComputerPolicyFinished,
    ComputerPushCapabilityChanged,
    DeviceAddedToDep,
    JssShutdown,
    JssStartup,
    MobileDeviceCheckIn,
    MobileDeviceCommandCompleted,
    MobileDeviceEnrolled,
    MobileDevicePushSent,
    MobileDeviceUnEnrolled,
    PatchSoftwareTitleUpdated,
    PushSent,
    RestApiOperation,
    ScepChallenge,
    SmartGroupComputerMembershipChange,
    SmartGroupMobileDeviceMembershipChange,
    SmartGroupUserMembershipChange,
}

impl EventTag {
    /// Every known tag, in declaration order
    pub const ALL: [EventTag; 20] = [
        EventTag::ComputerAdded,
        EventTag::ComputerCheckIn,
        EventTag::ComputerInventoryCompleted,
        EventTag::ComputerPolicyFinished,
        EventTag::ComputerPushCapabilityChanged,
        EventTag::DeviceAddedToDep,
        EventTag::JssShutdown,
        EventTag::JssStartup,
        EventTag::MobileDeviceCheckIn,
        EventTag::MobileDeviceCommandCompleted,
        EventTag::MobileDeviceEnrolled,
        EventTag::MobileDevicePushSent,
        EventTag::MobileDeviceUnEnrolled,
        EventTag::PatchSoftwareTitleUpdated,
        EventTag::PushSent,
        EventTag::RestApiOperation,
        EventTag::ScepChallenge,
        EventTag::SmartGroupComputerMembershipChange,
        EventTag::SmartGroupMobileDeviceMembershipChange,
        EventTag::SmartGroupUserMembershipChange,
    ];

    /// Older or shortened names accepted when parsing.
    ///
    /// Parsing an alias yields the tag, but the tag always displays with its
    /// platform name.
    pub const ALIASES: [(&'static str, EventTag); 1] =
        [("DeviceEnrolled", EventTag::MobileDeviceEnrolled)];

    /// Platform name of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            EventTag::ComputerAdded => "ComputerAdded",
            EventTag::ComputerCheckIn => "ComputerCheckIn",
            EventTag::ComputerInventoryCompleted => "ComputerInventoryCompleted",
            EventTag::ComputerPolicyFinished => "ComputerPolicyFinished",
            EventTag::ComputerPushCapabilityChanged => "ComputerPushCapabilityChanged",
            EventTag::DeviceAddedToDep => "DeviceAddedToDEP",
            EventTag::JssShutdown => "JSSShutdown",
            EventTag::JssStartup => "JSSStartup",
            EventTag::MobileDeviceCheckIn => "MobileDeviceCheckIn",
            EventTag::MobileDeviceCommandCompleted => "MobileDeviceCommandCompleted",
            EventTag::MobileDeviceEnrolled => "MobileDeviceEnrolled",
            EventTag::MobileDevicePushSent => "MobileDevicePushSent",
            EventTag::MobileDeviceUnEnrolled => "MobileDeviceUnEnrolled",
            EventTag::PatchSoftwareTitleUpdated => "PatchSoftwareTitleUpdated",
            EventTag::PushSent => "PushSent",
            EventTag::RestApiOperation => "RestAPIOperation",
            EventTag::ScepChallenge => "SCEPChallenge",
            EventTag::SmartGroupComputerMembershipChange => "SmartGroupComputerMembershipChange",
            EventTag::SmartGroupMobileDeviceMembershipChange => {
                "SmartGroupMobileDeviceMembershipChange"
            }
            EventTag::SmartGroupUserMembershipChange => "SmartGroupUserMembershipChange",
        }
    }

    /// Check whether the event concerns a computer
    pub fn is_computer_event(&self) -> bool {
        self.as_str().starts_with("Computer") || *self == EventTag::SmartGroupComputerMembershipChange
    }

    /// Check whether the event concerns a mobile device
    pub fn is_mobile_device_event(&self) -> bool {
        self.as_str().starts_with("MobileDevice")
            || *self == EventTag::SmartGroupMobileDeviceMembershipChange
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a name is not a known event tag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event type: {0}")]
pub struct UnknownTag(pub String);

impl FromStr for EventTag {
    type Err = UnknownTag;

    /// Exact platform names first, then a case-insensitive match, then
    /// [`EventTag::ALIASES`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        EventTag::ALL
            .iter()
            .find(|tag| tag.as_str() == s)
            .or_else(|| EventTag::ALL.iter().find(|tag| tag.as_str().eq_ignore_ascii_case(s)))
            .copied()
            .or_else(|| {
                EventTag::ALIASES
                    .iter()
                    .find(|(alias, _)| alias.eq_ignore_ascii_case(s))
                    .map(|(_, tag)| *tag)
            })
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

impl Serialize for EventTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
