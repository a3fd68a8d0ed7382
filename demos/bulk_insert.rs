use std::time::Instant;

use clap::Parser;
use fake::faker::company::en::CompanyName;
use fake::Fake;
use updraft::backend::BackendResult;
use updraft::catalog::{Catalog, ColumnDef, KeyDef, TableSchema};
use updraft::command::{Command, CommandKind, ParameterSlot};
use updraft::types::{DataType, Value};
use updraft::{
    BackendConnection, BackendError, Connector, ExecutorConfig, Outcome, PreparedBatch,
    UpdraftError,
};

/// A tool to bulk-insert synthetic orders through the batched executor
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// How many orders to insert
    #[arg(short, long, default_value_t = 10_000)]
    count: usize,

    /// Maximum rows per batch chunk
    #[arg(long, default_value_t = 2048)]
    chunk_size: usize,

    /// Keep executing chunks after a row-level failure
    #[arg(long)]
    best_effort: bool,
}

/// In-memory backend with a unique key on the first bound column.
struct DemoBackend {
    rows: Vec<Vec<Value>>,
}

struct DemoBatch<'a> {
    backend: &'a mut DemoBackend,
    queued: Vec<Vec<Value>>,
}

impl BackendConnection for DemoBackend {
    fn prepare<'a>(&'a mut self, _sql: &str) -> BackendResult<Box<dyn PreparedBatch + 'a>> {
        Ok(Box::new(DemoBatch {
            backend: self,
            queued: Vec::new(),
        }))
    }

    fn execute_direct(&mut self, _sql: &str) -> BackendResult<u64> {
        let removed = self.rows.len() as u64;
        self.rows.clear();
        Ok(removed)
    }
}

impl PreparedBatch for DemoBatch<'_> {
    fn add_row(&mut self, row: &[Value]) -> BackendResult<()> {
        self.queued.push(row.to_vec());
        Ok(())
    }

    fn execute_batch(&mut self) -> BackendResult<Vec<Outcome>> {
        let rows = std::mem::take(&mut self.queued);
        Ok(rows
            .into_iter()
            .map(|row| {
                let duplicate = self.backend.rows.iter().any(|r| r.first() == row.first());
                if duplicate {
                    Outcome::Failed(Some(
                        BackendError::new("duplicate key").with_sqlstate("23505"),
                    ))
                } else {
                    self.backend.rows.push(row);
                    Outcome::Applied(1)
                }
            })
            .collect())
    }

    fn execute_update(&mut self, row: &[Value]) -> BackendResult<u64> {
        self.backend.rows.push(row.to_vec());
        Ok(1)
    }
}

fn orders_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog
        .create_table(
            TableSchema::new(
                "orders".to_string(),
                vec![
                    ColumnDef::new("id".to_string(), DataType::Int64).unwrap(),
                    ColumnDef::new("customer".to_string(), DataType::String).unwrap(),
                    ColumnDef::new("total".to_string(), DataType::Float64).unwrap(),
                ],
            )
            .unwrap()
            .with_primary_key(KeyDef::new(vec!["id".to_string()])),
        )
        .unwrap();
    catalog
}

fn insert_orders(ids: Vec<Value>, customers: Vec<Value>, totals: Vec<Value>) -> Command {
    Command::new(
        CommandKind::Insert,
        "orders".to_string(),
        vec![
            "id".to_string(),
            "customer".to_string(),
            "total".to_string(),
        ],
        "INSERT INTO orders (id, customer, total) VALUES (?, ?, ?)".to_string(),
        vec![
            ParameterSlot::vectorized(ids),
            ParameterSlot::vectorized(customers),
            ParameterSlot::vectorized(totals),
        ],
    )
    .expect("valid command")
}

fn main() {
    let args = Args::parse();

    let config = ExecutorConfig::new()
        .with_max_batch_size(args.chunk_size)
        .with_fail_fast(!args.best_effort);
    let connector = Connector::new(config).expect("valid configuration");
    connector.install_catalog(orders_catalog());

    let mut backend = DemoBackend { rows: Vec::new() };

    println!("Generating {} orders...", args.count);
    let ids: Vec<Value> = (0..args.count as i64).map(Value::Int64).collect();
    let customers: Vec<Value> = (0..args.count)
        .map(|_| Value::String(CompanyName().fake()))
        .collect();
    let totals: Vec<Value> = (0..args.count)
        .map(|_| Value::Float64((5.0..500.0).fake()))
        .collect();

    println!("Executing with chunk size {}...", args.chunk_size);
    let start = Instant::now();
    let result = connector
        .execute(&mut backend, &insert_orders(ids, customers, totals))
        .expect("bulk insert");
    let elapsed = start.elapsed();

    println!(
        "Inserted {} rows in {} chunks ({} reported affected) in {:.2?}",
        result.rows, result.chunks, result.total_affected, elapsed
    );
    println!(
        "Throughput: {:.0} rows/s",
        result.rows as f64 / elapsed.as_secs_f64()
    );

    // Re-insert two existing ids to show per-row failure reporting.
    let retry = insert_orders(
        vec![
            Value::Int64(0),
            Value::Int64(args.count as i64),
            Value::Int64(1),
        ],
        vec![
            Value::String("Retry Inc".to_string()),
            Value::String("Retry Inc".to_string()),
            Value::String("Retry Inc".to_string()),
        ],
        vec![
            Value::Float64(1.0),
            Value::Float64(2.0),
            Value::Float64(3.0),
        ],
    );
    match connector.execute(&mut backend, &retry) {
        Ok(result) => println!("Retry applied {} rows", result.total_affected),
        Err(UpdraftError::BatchFailed(failure)) => {
            println!(
                "Retry: rows {:?} rejected, {} of {} applied",
                failure.failed_indices(),
                failure.total_affected,
                failure.row_count
            );
        }
        Err(err) => println!("Retry error: {err}"),
    }
}
