use super::types::{Request, Response};
use crate::config::WorkerConfig;
use crate::error::{Error, Result};
use crate::model::{
    BidderCounts, BidderHandle, BidderId, Bundle, GenericAllocation, RngSupplier, SamplerRequest,
    SolverConfig, ValueModel, World, XorBid, XorBidStream,
};
use serde::de::DeserializeOwned;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use tracing::{debug, trace, warn};

/// `ValueModel` spoken over a request/response byte channel
pub struct WireModel<R: BufRead, W: Write> {
    reader: R,
    writer: W,
    line: String,
}

impl<R: BufRead, W: Write> WireModel<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            line: String::new(),
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn send(&mut self, request: &Request) -> Result<()> {
        trace!(target: "mrvm::wire", "-> {:?}", request);
        serde_json::to_writer(&mut self.writer, request)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    fn call<T: DeserializeOwned>(&mut self, request: &Request) -> Result<T> {
        self.send(request)?;

        self.line.clear();
        let read = self.reader.read_line(&mut self.line)?;
        if read == 0 {
            return Err(Error::Transport(format!(
                "worker closed the connection during {}",
                request.op()
            )));
        }
        trace!(target: "mrvm::wire", "<- {}", self.line.trim_end());

        match serde_json::from_str::<Response>(&self.line)? {
            Response::Ok { result } => serde_json::from_value(result).map_err(|e| {
                Error::Transport(format!("unexpected result for {}: {}", request.op(), e))
            }),
            Response::Error { kind, message } => {
                debug!(target: "mrvm::wire", "{} failed: {:?} {}", request.op(), kind, message);
                Err((kind, message).into())
            }
        }
    }
}

impl<R: BufRead, W: Write> ValueModel for WireModel<R, W> {
    fn configure(&mut self, counts: BidderCounts) -> Result<()> {
        self.call(&Request::Configure { counts })
    }

    fn create_world(&mut self, rng: RngSupplier) -> Result<World> {
        self.call(&Request::CreateWorld { rng })
    }

    fn create_population(&mut self, _world: &World, rng: RngSupplier) -> Result<Vec<BidderHandle>> {
        self.call(&Request::CreatePopulation { rng })
    }

    fn calculate_value(&mut self, bidder: BidderId, bundle: &Bundle) -> Result<f64> {
        self.call(&Request::CalculateValue {
            bidder,
            bundle: bundle.clone(),
        })
    }

    fn sample_xor_bids(&mut self, bidder: BidderId, request: &SamplerRequest) -> Result<XorBidStream<'_>> {
        let bids: Vec<XorBid> = self.call(&Request::SampleXorBids {
            bidder,
            request: *request,
        })?;
        Ok(Box::new(bids.into_iter().map(Ok)))
    }

    fn solve_efficient_allocation(
        &mut self,
        bidders: &[BidderId],
        solver: &SolverConfig,
    ) -> Result<GenericAllocation> {
        self.call(&Request::SolveEfficientAllocation {
            bidders: bidders.to_vec(),
            solver: *solver,
        })
    }
}

/// A model worker running as a child process, talking over its stdin/stdout
pub struct ProcessModel {
    wire: Option<WireModel<BufReader<ChildStdout>, ChildStdin>>,
    child: Child,
}

impl ProcessModel {
    pub fn spawn(config: &WorkerConfig) -> Result<Self> {
        let mut command = Command::new(&config.program);
        command
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        if let Some(dir) = &config.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|e| {
            Error::Transport(format!("failed to start worker {}: {}", config.program, e))
        })?;
        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let (Some(stdin), Some(stdout)) = (stdin, stdout) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(Error::Transport("worker pipes unavailable".to_string()));
        };

        debug!(target: "mrvm::wire", "started worker {} (pid {})", config.program, child.id());
        Ok(Self {
            wire: Some(WireModel::new(BufReader::new(stdout), stdin)),
            child,
        })
    }

    fn wire(&mut self) -> Result<&mut WireModel<BufReader<ChildStdout>, ChildStdin>> {
        self.wire
            .as_mut()
            .ok_or_else(|| Error::Transport("worker already shut down".to_string()))
    }
}

impl ValueModel for ProcessModel {
    fn configure(&mut self, counts: BidderCounts) -> Result<()> {
        self.wire()?.configure(counts)
    }

    fn create_world(&mut self, rng: RngSupplier) -> Result<World> {
        self.wire()?.create_world(rng)
    }

    fn create_population(&mut self, world: &World, rng: RngSupplier) -> Result<Vec<BidderHandle>> {
        self.wire()?.create_population(world, rng)
    }

    fn calculate_value(&mut self, bidder: BidderId, bundle: &Bundle) -> Result<f64> {
        self.wire()?.calculate_value(bidder, bundle)
    }

    fn sample_xor_bids(&mut self, bidder: BidderId, request: &SamplerRequest) -> Result<XorBidStream<'_>> {
        self.wire()?.sample_xor_bids(bidder, request)
    }

    fn solve_efficient_allocation(
        &mut self,
        bidders: &[BidderId],
        solver: &SolverConfig,
    ) -> Result<GenericAllocation> {
        self.wire()?.solve_efficient_allocation(bidders, solver)
    }
}

impl Drop for ProcessModel {
    fn drop(&mut self) {
        if let Some(mut wire) = self.wire.take()
            && let Err(e) = wire.send(&Request::Shutdown)
        {
            warn!(target: "mrvm::wire", "failed to send shutdown to worker: {}", e);
        }
        // stdin is closed by now, so a worker that ignored shutdown still sees EOF
        if let Err(e) = self.child.wait() {
            warn!(target: "mrvm::wire", "failed to reap worker: {}", e);
        }
    }
}
