//! Color and number game rooms.

use std::io::Write;

use serde_json::Value;
use utpfund_admin::ActionReceipt;
use utpfund_admin::actions::{ColorRoomAction, NumberRoomAction};
use utpfund_admin::services::RoomService;
use utpfund_core::{
    ColorRoom, CreateColorRoom, CreateNumberRoom, NumberRoom, NumberRoomPatch, RoomDetails,
    RoomId, RoomStatus,
};

use super::{Console, ListQuery};
use crate::error::CliError;
use crate::output::write_view;

/// List color rooms.
///
/// # Errors
///
/// Returns an error if the fetch fails.
pub async fn list_color(
    console: &Console,
    out: &mut impl Write,
    status: Option<RoomStatus>,
    query: &ListQuery,
) -> Result<(), CliError> {
    let list = console.load::<ColorRoom>(status, query).await?;
    write_view(
        out,
        &list.view(),
        &["Room", "Entry", "Prize", "Players", "Colors", "Status", "Created"],
        |r| {
            vec![
                r.room_id.to_string(),
                r.entry_fee.to_string(),
                r.winning_amount.to_string(),
                format!("{}/{}", r.current_players, r.max_players),
                r.available_colors.join(","),
                r.status.to_string(),
                r.created_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        },
    )?;
    Ok(())
}

/// List number rooms.
///
/// # Errors
///
/// Returns an error if the fetch fails.
pub async fn list_number(
    console: &Console,
    out: &mut impl Write,
    status: Option<RoomStatus>,
    query: &ListQuery,
) -> Result<(), CliError> {
    let list = console.load::<NumberRoom>(status, query).await?;
    write_view(
        out,
        &list.view(),
        &["Room", "Entry", "Multiplier", "Players", "Big/Small", "Status", "Created"],
        |r| {
            vec![
                r.room_id.to_string(),
                r.entry_fee.to_string(),
                format!("x{}", r.winning_multiplier),
                format!("{}/{}", r.current_players, r.max_players),
                format!("{}/{}", r.big_players, r.small_players),
                r.status.to_string(),
                r.created_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        },
    )?;
    Ok(())
}

/// Open a color room.
///
/// # Errors
///
/// Returns the action failure.
pub async fn create_color(
    console: &Console,
    out: &mut impl Write,
    room: CreateColorRoom,
) -> Result<(), CliError> {
    let mut list = console.list::<ColorRoom>();
    let receipt = console
        .executor()
        .execute(&mut list, &ColorRoomAction::Create(room))
        .await?;
    write_receipt(out, &receipt, list.items().len())
}

/// Open a number room.
///
/// # Errors
///
/// Returns the action failure.
pub async fn create_number(
    console: &Console,
    out: &mut impl Write,
    room: CreateNumberRoom,
) -> Result<(), CliError> {
    run_number(console, out, NumberRoomAction::Create(room)).await
}

/// Close a number room.
///
/// # Errors
///
/// Returns the action failure.
pub async fn close_number(
    console: &Console,
    out: &mut impl Write,
    room_id: String,
) -> Result<(), CliError> {
    run_number(console, out, NumberRoomAction::Close(RoomId::new(room_id))).await
}

/// Delete a number room.
///
/// # Errors
///
/// Returns the action failure.
pub async fn delete_number(
    console: &Console,
    out: &mut impl Write,
    room_id: String,
) -> Result<(), CliError> {
    run_number(console, out, NumberRoomAction::Delete(RoomId::new(room_id))).await
}

/// Change a number room's settings. An empty patch is refused locally.
///
/// # Errors
///
/// Returns the action failure.
pub async fn update_number(
    console: &Console,
    out: &mut impl Write,
    room_id: String,
    patch: NumberRoomPatch,
) -> Result<(), CliError> {
    run_number(
        console,
        out,
        NumberRoomAction::Update(RoomId::new(room_id), patch),
    )
    .await
}

async fn run_number(
    console: &Console,
    out: &mut impl Write,
    action: NumberRoomAction,
) -> Result<(), CliError> {
    let mut list = console.list::<NumberRoom>();
    let receipt = console.executor().execute(&mut list, &action).await?;
    write_receipt(out, &receipt, list.items().len())
}

fn write_receipt(
    out: &mut impl Write,
    receipt: &ActionReceipt,
    rooms: usize,
) -> Result<(), CliError> {
    match &receipt.message {
        Some(message) => writeln!(out, "{}: {message}", receipt.slot)?,
        None => writeln!(out, "{}: done", receipt.slot)?,
    }
    if receipt.refreshed {
        writeln!(out, "{rooms} rooms listed")?;
    } else {
        writeln!(out, "! The room list could not be refreshed")?;
    }
    Ok(())
}

/// Print the detail payload of one number room.
///
/// # Errors
///
/// Returns an error if the lookup fails.
pub async fn details(
    console: &Console,
    out: &mut impl Write,
    room_id: String,
) -> Result<(), CliError> {
    let details = RoomService::new(console.gateway().clone())
        .number_room_details(&RoomId::new(room_id))
        .await?;
    write_details(out, &details)
}

fn write_details(out: &mut impl Write, details: &RoomDetails) -> Result<(), CliError> {
    for (key, value) in &details.fields {
        match value {
            Value::String(text) => writeln!(out, "{key}: {text}")?,
            Value::Array(_) | Value::Object(_) => writeln!(out, "{key}:\n{value:#}")?,
            _ => writeln!(out, "{key}: {value}")?,
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_details_render_scalars_inline() {
        let details: RoomDetails = serde_json::from_value(json!({
            "roomId": "NR-1042",
            "currentPlayers": 4,
            "bets": [{ "user": "Asha", "choice": "big" }]
        }))
        .unwrap();

        let mut out = Vec::new();
        write_details(&mut out, &details).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("roomId: NR-1042\n"));
        assert!(text.contains("currentPlayers: 4\n"));
        assert!(text.contains("bets:\n[\n"));
        assert!(text.contains("\"choice\": \"big\""));
    }
}
