// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

use std::{env, error::Error, fs, sync::Arc};

use dayone_catalog::{ColumnToCreate, TablePatch, Visibility};
use dayone_engine::{CreateTable, EngineConfig, ListRows, ListTablesRequest, TableService};
use dayone_policy::{Principal, PrincipalDirectory, PrincipalResolver};
use dayone_store_sqlite::{SqliteConfig, SqliteStorage};
use dayone_type::{PrincipalId, Value};
use indexmap::IndexMap;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

const DB_PATH: &str = "DAYONE_DB_PATH";
const CONFIG: &str = "DAYONE_CONFIG";

fn init_logging() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

/// `DAYONE_CONFIG` holds either inline JSON or the path of a JSON file.
fn engine_config() -> Result<EngineConfig, Box<dyn Error>> {
	let Ok(raw) = env::var(CONFIG) else {
		return Ok(EngineConfig::default());
	};
	let json = if raw.trim_start().starts_with('{') {
		raw
	} else {
		fs::read_to_string(&raw)?
	};
	Ok(serde_json::from_str(&json)?)
}

fn storage_config() -> SqliteConfig {
	match env::var(DB_PATH) {
		Ok(path) if !path.is_empty() => SqliteConfig::file(path),
		_ => SqliteConfig::in_memory(),
	}
}

fn row<const N: usize>(entries: [(&str, Value); N]) -> IndexMap<String, Value> {
	entries.into_iter().map(|(name, value)| (name.to_string(), value)).collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	init_logging();

	let storage = Arc::new(SqliteStorage::new(storage_config())?);
	let service = TableService::open(storage, engine_config()?).await?;

	let directory = PrincipalDirectory::new();
	directory.register("alice-token", Principal::standard(PrincipalId::generate()));
	directory.register("bob-token", Principal::standard(PrincipalId::generate()));
	let alice = directory.resolve("Bearer alice-token")?;
	let bob = directory.resolve("Bearer bob-token")?;

	let name = format!("inventory_{}", service.catalog().len());
	let table = service
		.create_table(
			&alice,
			CreateTable::new(
				name,
				vec![
					ColumnToCreate::new("sku", "TEXT", false),
					ColumnToCreate::new("quantity", "INTEGER", true),
					ColumnToCreate::new("price_cents", "INTEGER", true),
				],
			)
			.with_description("warehouse stock"),
		)
		.await?;
	info!(table = %table.name, id = %table.id, "created");

	for (sku, quantity, price) in [("A-100", 12, 950), ("B-200", 0, 12000), ("C-300", 7, 325)] {
		service
			.insert_row(
				&alice,
				table.id,
				row([("sku", Value::text(sku)), ("quantity", Value::Integer(quantity)), ("price_cents", Value::Integer(price))]),
			)
			.await?;
	}

	let hidden = service.get_table(Some(&bob), table.id).await;
	info!(code = %hidden.err().map(|err| err.code.clone()).unwrap_or_default(), "bob looks at a private table");

	service
		.update_table(
			&alice,
			table.id,
			TablePatch {
				visibility: Some(Visibility::Public),
				..TablePatch::default()
			},
		)
		.await?;
	service.add_column(&alice, table.id, ColumnToCreate::new("discontinued", "BOOLEAN", false).with_default(false)).await?;

	let page = service.list_rows(Some(&bob), table.id, ListRows::page(1, 2)).await?;
	info!(total = page.total_count, returned = page.rows.len(), "bob reads the public table");
	println!("{}", serde_json::to_string_pretty(&page)?);

	let denied = service.insert_row(&bob, table.id, row([("sku", Value::text("X-1"))])).await;
	info!(code = %denied.err().map(|err| err.code.clone()).unwrap_or_default(), "bob tries to write");

	for listed in service.list_tables(None, ListTablesRequest::default()).await? {
		info!(table = %listed.name, rows = listed.row_count, columns = listed.columns.len(), "public table");
	}

	Ok(())
}
