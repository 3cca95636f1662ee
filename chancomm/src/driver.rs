//! Reproduction driver: one deterministic set/get round-trip on a ring.
//!
//! Each locality sends its own index to its ring successor and receives its
//! predecessor's index, both on tag 0 of one shared channel set. Progress is
//! reported line by line on stdout so a hang or failure can be localized to
//! the exact step; any failure is absorbed into a logged diagnostic plus the
//! graceful finalize path, never a crash.

use crate::error::CommError;
use crate::locality::Tag;
use crate::runtime::RuntimeContext;

/// Channel-set name every participant rendezvouses on. Must be identical
/// across all localities of a run.
pub const CHANNEL_COMMUNICATOR_NAME: &str = "/chancomm/repro/";

/// Per-participant message table of size `num_localities`: entry `k` is `k`.
///
/// The driver sends its own entry, so the value sent by locality `i` always
/// equals `i`.
pub fn message_table(num_localities: u32) -> Vec<i32> {
    (0..num_localities as i32).collect()
}

/// Program main body, run once per locality.
///
/// Returns the exit code produced by [`RuntimeContext::finalize`] on every
/// path. Pass this to [`RuntimeBuilder::run`](crate::RuntimeBuilder::run).
pub async fn run(ctx: RuntimeContext) -> i32 {
    println!("Starting channel communicator set/get test...");

    let num_localities = ctx.num_localities();
    let this_locality = ctx.this_locality();
    println!("Number of localities: {num_localities}");
    println!("This locality: {this_locality}");

    if let Err(err) = exchange(&ctx).await {
        eprintln!("Exception caught: {err}");
        eprintln!("typeid: {}", std::any::type_name_of_val(&err));
        tracing::error!(locality = %this_locality, error = %err, "exchange failed");
        return ctx.finalize();
    }

    println!("All operations completed successfully!");
    ctx.finalize()
}

/// The fallible part of the driver: endpoint creation, one send, one receive.
async fn exchange(ctx: &RuntimeContext) -> Result<i32, CommError> {
    let topology = ctx.topology();

    let comm = ctx.registry().create_channel_communicator(
        CHANNEL_COMMUNICATOR_NAME,
        topology.num_localities(),
        topology.this_locality(),
    )?;
    println!("Channel communicator created successfully");

    let next_locality = topology.successor();
    let msg_vec = message_table(topology.num_localities());
    let msg = msg_vec[topology.this_locality().as_usize()];

    println!("About to call set()");
    let setf = comm.set(next_locality, &msg, Tag(0));
    println!("set() call completed, waiting for result...");
    setf.await?;
    println!("set() operation successful!");

    let prev_locality = topology.predecessor();
    let received: i32 = comm.get(prev_locality, Tag(0)).await?;
    println!("get() operation successful, received: {received}");

    Ok(received)
}
