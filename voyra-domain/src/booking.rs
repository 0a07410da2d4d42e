use serde::{Deserialize, Serialize};

/// How many passengers of one pricing category are on a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerCount {
    pub pricing_category_id: String,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationState {
    Held,
    Confirmed,
    Cancelled,
    Expired,
}

impl ReservationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationState::Held => "HELD",
            ReservationState::Confirmed => "CONFIRMED",
            ReservationState::Cancelled => "CANCELLED",
            ReservationState::Expired => "EXPIRED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingState {
    Confirmed,
    Cancelled,
}

impl BookingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingState::Confirmed => "CONFIRMED",
            BookingState::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrTicket {
    pub ticket_barcode: String,
}

/// One ticket per (passenger, pricing category) pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub pricing_category_id: String,
    pub qr_ticket: QrTicket,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingChannel {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyContact {
    pub id: String,
    pub title: String,
    pub company_registration_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtranetUser {
    pub email: String,
    pub full_name: String,
}

/// Sales-channel context accompanying every lifecycle call. The tagged
/// representation guarantees the segment matches the payload present; beyond
/// that the adapter only logs or forwards it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "segment",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum BookingSource {
    Ota {
        booking_channel: BookingChannel,
    },
    Marketplace {
        booking_channel: BookingChannel,
        marketplace_vendor: CompanyContact,
    },
    AgentArea {
        booking_channel: BookingChannel,
        booking_agent: CompanyContact,
    },
    DirectOffline {
        booking_channel: BookingChannel,
        extranet_user: ExtranetUser,
    },
}

impl BookingSource {
    pub fn booking_channel(&self) -> &BookingChannel {
        match self {
            BookingSource::Ota { booking_channel }
            | BookingSource::Marketplace {
                booking_channel, ..
            }
            | BookingSource::AgentArea {
                booking_channel, ..
            }
            | BookingSource::DirectOffline {
                booking_channel, ..
            } => booking_channel,
        }
    }

    /// Trace who initiated the booking; informational only.
    pub fn trace(&self) {
        let channel = self.booking_channel();
        tracing::trace!("booking channel: {} '{}'", channel.id, channel.title);
        match self {
            BookingSource::Ota { booking_channel } => {
                tracing::trace!("OTA system: {:?}", booking_channel.system_type);
            }
            BookingSource::Marketplace {
                marketplace_vendor, ..
            } => {
                tracing::trace!(
                    "reseller vendor: {} '{}' reg.no. {}",
                    marketplace_vendor.id,
                    marketplace_vendor.title,
                    marketplace_vendor.company_registration_number
                );
            }
            BookingSource::AgentArea { booking_agent, .. } => {
                tracing::trace!(
                    "booking agent: {} '{}' reg.no. {}",
                    booking_agent.id,
                    booking_agent.title,
                    booking_agent.company_registration_number
                );
            }
            BookingSource::DirectOffline { extranet_user, .. } => {
                tracing::trace!(
                    "extranet user: {} '{}'",
                    extranet_user.email,
                    extranet_user.full_name
                );
            }
        }
    }
}
