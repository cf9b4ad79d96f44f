//! Conversation listing for a user.

use anyhow::{Context, Result};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use crate::state::AppState;

/// List a user's conversations, newest first, with message counts.
pub async fn list_conversations(state: &AppState, email: &str, json: bool) -> Result<()> {
    let user = state
        .user_service
        .get_user_by_email(email)
        .await
        .with_context(|| format!("User '{email}' not found"))?;

    let conversations = state.chat_service.list_conversations(user.id).await?;

    let mut rows = Vec::with_capacity(conversations.len());
    for conversation in conversations {
        let messages = state.chat_service.count_messages(conversation.id).await?;
        rows.push((conversation, messages));
    }

    if json {
        let result: Vec<serde_json::Value> = rows
            .iter()
            .map(|(c, messages)| {
                serde_json::json!({
                    "id": c.id,
                    "title": c.title,
                    "created_at": c.created_at,
                    "messages": messages,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!();
        println!("  No conversations for {}.", style(&user.email).cyan());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Title").fg(Color::Cyan),
            Cell::new("Messages").fg(Color::Cyan),
            Cell::new("Created").fg(Color::Cyan),
        ]);

    for (c, messages) in &rows {
        table.add_row(vec![
            Cell::new(c.id),
            Cell::new(c.title.as_deref().unwrap_or("-")),
            Cell::new(messages),
            Cell::new(c.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }

    println!();
    println!("  Conversations for {}", style(&user.email).cyan().bold());
    println!("{table}");
    println!();

    Ok(())
}
