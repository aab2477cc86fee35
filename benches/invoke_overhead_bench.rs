// Invocation overhead benchmark
// Measures what profiling adds on top of a bare dynamic call
// Target: p50 overhead < 50us, p95 overhead < 200us per call

use probebox::observability::memory::TrackingAllocator;
use probebox::reflect::submission::int_arg;
use probebox::{
    ClassDescriptor, ClassRegistry, MethodDescriptor, Profiled, ProfiledInvoker,
    SignatureValidator, Statistics, Submission, SubmissionClass, SubmissionError, TypeDescriptor,
    Value,
};
use std::time::{Duration, Instant};

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

const ITERATIONS: usize = 10_000;
const WARMUP_ITERATIONS: usize = 500;

struct LatencyStats {
    p50: Duration,
    p95: Duration,
    p99: Duration,
    min: Duration,
    max: Duration,
    mean: Duration,
}

impl LatencyStats {
    fn from_samples(mut samples: Vec<Duration>) -> Self {
        samples.sort();
        let len = samples.len();

        let p50_idx = (len as f64 * 0.50) as usize;
        let p95_idx = (len as f64 * 0.95) as usize;
        let p99_idx = (len as f64 * 0.99) as usize;

        let sum: Duration = samples.iter().sum();
        let mean = sum / len as u32;

        Self {
            p50: samples[p50_idx],
            p95: samples[p95_idx],
            p99: samples[p99_idx],
            min: samples[0],
            max: samples[len - 1],
            mean,
        }
    }

    fn print(&self, label: &str) {
        println!("\n{}", label);
        println!("  p50: {:?}", self.p50);
        println!("  p95: {:?}", self.p95);
        println!("  p99: {:?}", self.p99);
        println!("  min: {:?}", self.min);
        println!("  max: {:?}", self.max);
        println!("  mean: {:?}", self.mean);
    }
}

#[derive(Default)]
struct Adder {
    statistics: Statistics,
}

impl Profiled for Adder {
    fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    fn statistics_mut(&mut self) -> &mut Statistics {
        &mut self.statistics
    }
}

impl Submission for Adder {
    fn class_name(&self) -> &str {
        "Adder"
    }

    fn call(&mut self, method: &str, args: &[Value]) -> Result<Value, SubmissionError> {
        match method {
            "add" => Ok(Value::Int(int_arg(args, 0)?.wrapping_add(int_arg(args, 1)?))),
            other => Err(SubmissionError::NoSuchMethod(other.to_string())),
        }
    }
}

impl SubmissionClass for Adder {
    fn descriptor() -> ClassDescriptor {
        ClassDescriptor::new("Adder").method(
            MethodDescriptor::public("add")
                .params([TypeDescriptor::Int, TypeDescriptor::Int])
                .returns(TypeDescriptor::Int),
        )
    }

    fn instantiate() -> Self {
        Adder::default()
    }
}

fn sample<F: FnMut(i32)>(mut call: F) -> LatencyStats {
    for i in 0..WARMUP_ITERATIONS {
        call(i as i32);
    }

    let mut samples = Vec::with_capacity(ITERATIONS);
    for i in 0..ITERATIONS {
        let start = Instant::now();
        call(i as i32);
        samples.push(start.elapsed());
    }
    LatencyStats::from_samples(samples)
}

fn main() {
    println!("=== probebox Invocation Overhead Benchmark ===");
    println!("Iterations: {} (after {} warmup)", ITERATIONS, WARMUP_ITERATIONS);

    let mut registry = ClassRegistry::new();
    if let Err(e) = registry.register::<Adder>() {
        eprintln!("registration failed: {}", e);
        std::process::exit(2);
    }
    let validator = SignatureValidator::new(&registry);
    let method = match validator.resolve("Adder", "add", "int", &["int", "int"]) {
        Ok(method) => method,
        Err(e) => {
            eprintln!("validation failed: {}", e);
            std::process::exit(2);
        }
    };

    let mut direct = Adder::instantiate();
    let bare = sample(|i| {
        let _ = direct.call("add", &[Value::Int(i), Value::Int(1)]);
    });

    let invoker = ProfiledInvoker::default();
    let mut profiled_target = Adder::instantiate();
    let profiled = sample(|i| {
        let _ = invoker.invoke_method(&mut profiled_target, &method, &[Value::Int(i), Value::Int(1)]);
    });

    bare.print("Direct call");
    profiled.print("Profiled call");

    let p50_overhead = profiled.p50.saturating_sub(bare.p50);
    let p95_overhead = profiled.p95.saturating_sub(bare.p95);

    println!("\n=== Summary ===");
    println!("p50 overhead: {:?}", p50_overhead);
    println!("p95 overhead: {:?}", p95_overhead);
    println!("peak heap seen: {} bytes", profiled_target.statistics().memory());

    if p50_overhead < Duration::from_micros(50) && p95_overhead < Duration::from_micros(200) {
        println!("✅ Overhead budget met");
        std::process::exit(0);
    } else {
        println!("❌ Overhead budget exceeded");
        std::process::exit(1);
    }
}
