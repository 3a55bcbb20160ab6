use aws_config::BehaviorVersion;
use aws_sdk_lambda::Client;
use clap::{Parser, ValueEnum};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

const STATES: [&str; 51] = [
    "AK", "AL", "AR", "AZ", "CA", "CO", "CT", "DC", "DE", "FL", "GA", "HI", "IA", "ID", "IL", "IN",
    "KS", "KY", "LA", "MA", "MD", "ME", "MI", "MN", "MO", "MS", "MT", "NC", "ND", "NE", "NH", "NJ",
    "NM", "NV", "NY", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VA", "VT", "WA",
    "WI", "WV", "WY",
];

const BUCKETS: [&str; 6] = [
    "stateBucket1",
    "stateBucket2",
    "stateBucket3",
    "stateBucket4",
    "otherNamesBucket1",
    "otherNamesBucket2",
];

#[derive(Default)]
struct Stats {
    success_count: usize,
    rejected_count: usize,
    error_count: usize,
    total_names: usize,
    total_latency_ms: f64,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "statusCode")]
    status_code: u16,
    body: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Shape {
    /// {"state": .., "bucket": ..}
    Direct,
    /// {"body": "{\"args\": {..}}"}
    GatewayArgs,
    /// {"body": "{\"call\": {\"transcript_with_tool_calls\": [..]}}"}
    GatewayToolCall,
}

#[derive(Clone, Debug)]
enum Selector {
    Named(String),
    Numbered(i64),
}

#[derive(Debug, PartialEq)]
enum Outcome {
    Names(usize),
    Rejected(String),
    Failed(String),
}

#[derive(Parser, Debug)]
#[command(name = "invoke-names")]
#[command(about = "Invoke the state names Lambda function")]
struct Args {
    /// Lambda function name
    function: String,

    /// Two-letter state code (random if omitted)
    #[arg(long)]
    state: Option<String>,

    /// Bucket name, e.g. stateBucket1 (random if neither selector is given)
    #[arg(long, conflicts_with = "bucket_number")]
    bucket: Option<String>,

    /// Numbered state bucket, 1 to 4
    #[arg(long)]
    bucket_number: Option<i64>,

    /// Which calling convention to send
    #[arg(long, value_enum, default_value = "direct")]
    shape: Shape,

    /// Number of iterations to run
    #[arg(long, default_value = "1")]
    iters: usize,

    /// Number of parallel threads
    #[arg(long, default_value = "1")]
    threads: usize,
}

fn request_args(state: &str, selector: &Selector) -> Value {
    match selector {
        Selector::Named(bucket) => json!({ "state": state, "bucket": bucket }),
        Selector::Numbered(number) => json!({ "state": state, "bucketNumber": number }),
    }
}

fn build_payload(shape: Shape, state: &str, selector: &Selector) -> Value {
    let args = request_args(state, selector);
    match shape {
        Shape::Direct => args,
        Shape::GatewayArgs => json!({
            "body": json!({ "name": "get_names_bucket", "args": args }).to_string()
        }),
        Shape::GatewayToolCall => json!({
            "body": json!({
                "call": {
                    "transcript_with_tool_calls": [{
                        "tool_call_id": "invoke-names",
                        "name": "get_names_bucket",
                        "arguments": args.to_string(),
                    }]
                }
            })
            .to_string()
        }),
    }
}

/// Unwrap a gateway envelope if there is one, then sort the reply into
/// names, an in-band error, or a runtime failure.
fn classify(raw: &str) -> Outcome {
    let reply = match serde_json::from_str::<Value>(raw) {
        Ok(reply) => reply,
        Err(e) => return Outcome::Failed(format!("unreadable response: {e}")),
    };

    let reply = match serde_json::from_value::<Envelope>(reply.clone()) {
        Ok(envelope) if envelope.status_code != 200 => {
            return Outcome::Failed(format!("status {}", envelope.status_code))
        }
        Ok(envelope) => match serde_json::from_str::<Value>(&envelope.body) {
            Ok(body) => body,
            Err(e) => return Outcome::Failed(format!("unreadable body: {e}")),
        },
        Err(_) => reply,
    };

    match &reply {
        Value::Array(names) => Outcome::Names(names.len()),
        Value::Object(fields) => {
            if let Some(message) = fields.get("error").and_then(Value::as_str) {
                Outcome::Rejected(message.to_string())
            } else if let Some(message) = fields.get("errorMessage").and_then(Value::as_str) {
                Outcome::Failed(message.to_string())
            } else {
                Outcome::Failed(format!("unexpected response: {reply}"))
            }
        }
        _ => Outcome::Failed(format!("unexpected response: {reply}")),
    }
}

fn pick_selector(args: &Args, rng: &mut StdRng) -> Selector {
    if let Some(bucket) = &args.bucket {
        Selector::Named(bucket.clone())
    } else if let Some(number) = args.bucket_number {
        Selector::Numbered(number)
    } else if rng.gen_bool(0.5) {
        Selector::Numbered(rng.gen_range(1..=4))
    } else {
        Selector::Named(BUCKETS.choose(rng).unwrap_or(&BUCKETS[0]).to_string())
    }
}

async fn run_invocations(
    client: Arc<Client>,
    args: Arc<Args>,
    thread_id: usize,
    start: usize,
    end: usize,
    stats: Arc<Mutex<Stats>>,
) {
    let mut rng = StdRng::from_entropy();

    for i in start..=end {
        let state = match &args.state {
            Some(state) => state.clone(),
            None => STATES.choose(&mut rng).unwrap_or(&"OH").to_string(),
        };
        let selector = pick_selector(&args, &mut rng);
        let payload = build_payload(args.shape, &state, &selector);

        let started = Instant::now();
        let result = client
            .invoke()
            .function_name(&args.function)
            .payload(aws_sdk_lambda::primitives::Blob::new(
                payload.to_string().into_bytes(),
            ))
            .send()
            .await;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        match result {
            Ok(response) => {
                let response_payload = response
                    .payload()
                    .map(|b| String::from_utf8_lossy(b.as_ref()).to_string())
                    .unwrap_or_else(|| "No response".to_string());

                let outcome = classify(&response_payload);

                {
                    let mut stats = stats.lock().await;
                    match &outcome {
                        Outcome::Names(count) => {
                            stats.success_count += 1;
                            stats.total_names += count;
                            stats.total_latency_ms += latency_ms;
                        }
                        Outcome::Rejected(_) => stats.rejected_count += 1,
                        Outcome::Failed(_) => stats.error_count += 1,
                    }
                }

                println!(
                    "[Thread {}: {}/{}] {} {:?} => {} ({:.3}ms)",
                    thread_id, i, args.iters, state, selector, response_payload, latency_ms
                );
            }
            Err(e) => {
                {
                    let mut stats = stats.lock().await;
                    stats.error_count += 1;
                }

                eprintln!(
                    "[Thread {}: {}/{}] Error invoking for {} {:?}: {}",
                    thread_id, i, args.iters, state, selector, e
                );
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    println!(
        "Running {} invocations across {} thread(s) as {:?}",
        args.iters, args.threads, args.shape
    );

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let client = Arc::new(Client::new(&config));

    let stats = Arc::new(Mutex::new(Stats::default()));

    let threads = args.threads.max(1);
    let iters_per_thread = args.iters / threads;
    let remainder = args.iters % threads;
    let args = Arc::new(args);

    let mut tasks = JoinSet::new();

    let mut start = 1;
    for t in 1..=threads {
        let end = if t == threads {
            start + iters_per_thread - 1 + remainder
        } else {
            start + iters_per_thread - 1
        };
        if end < start {
            continue;
        }

        let client = Arc::clone(&client);
        let args = Arc::clone(&args);
        let stats = Arc::clone(&stats);

        tasks.spawn(async move {
            run_invocations(client, args, t, start, end, stats).await;
        });

        start = end + 1;
    }

    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            eprintln!("Task failed: {}", e);
        }
    }

    let stats = stats.lock().await;
    println!("Completed {} invocations", args.iters);
    println!();
    println!("Results:");
    println!("  Success:  {}", stats.success_count);
    println!("  Rejected: {}", stats.rejected_count);
    println!("  Errors:   {}", stats.error_count);
    if stats.success_count > 0 {
        let avg_latency = stats.total_latency_ms / stats.success_count as f64;
        let avg_names = stats.total_names as f64 / stats.success_count as f64;
        println!("  Avg latency: {:.3}ms", avg_latency);
        println!("  Avg names:   {:.1}", avg_names);
    }
}
