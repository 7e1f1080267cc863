//! Operator-facing notification text.

use chrono::{DateTime, TimeZone};

use crate::inquiry::InquiryPayload;

const HEADER: &str = "🔔 [Studio Shift 상담 신청]";
const RULE: &str = "━━━━━━━━━━━━━━━━";
const CONSULTATION_FEE: &str = "💰 상담비: 100,000원";

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS TZ`.
pub fn format_timestamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y-%m-%d %H:%M:%S %Z").to_string()
}

/// Build the message sent to the operator. Field values are embedded
/// verbatim; the timestamp is the only part that varies between calls.
pub fn format_notification<Tz>(payload: &InquiryPayload, received_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{HEADER}\n\
         {RULE}\n\
         👤 이름: {name}\n\
         📞 연락처: {contact}\n\
         📍 위치: {location}\n\
         📐 면적: {area}\n\
         {RULE}\n\
         {CONSULTATION_FEE}\n\
         ⏰ 접수시간: {timestamp}",
        name = payload.name,
        contact = payload.contact,
        location = payload.location,
        area = payload.area,
        timestamp = format_timestamp(received_at),
    )
}
