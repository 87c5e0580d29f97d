use std::path::Path;
use fnv::FnvHashSet;

pub mod pricing;
pub mod data;

pub type Set<T> = FnvHashSet<T>;


mod logging_setup {
    use super::*;
    use tracing_subscriber::{EnvFilter, fmt, registry, prelude::*};
    use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};
    use std::fs::OpenOptions;

    /// Used when `RUST_LOG` is unset.
    const DEFAULT_DIRECTIVES: &str = "warn,espprc=info,instances=info";

    fn env_filter() -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
    }

    fn logfile_writer(path: &Path) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
        let logfile = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(NonBlockingBuilder::default().lossy(false).finish(logfile))
    }

    fn install<P: AsRef<Path>>(logfile: Option<P>) -> anyhow::Result<Option<WorkerGuard>> {
        let stderr_log = fmt::layer().with_writer(std::io::stderr);
        let r = registry().with(env_filter()).with(stderr_log);

        match logfile {
            Some(p) => {
                let (writer, guard) = logfile_writer(p.as_ref())?;
                let json = fmt::layer()
                    .json()
                    .with_span_list(true)
                    .with_current_span(false)
                    .with_writer(writer);
                r.with(json).try_init()?;
                Ok(Some(guard))
            },
            None => {
                r.try_init()?;
                Ok(None)
            }
        }
    }

    /// Install the global subscriber: filtered human-readable output on stderr, plus
    /// newline-delimited JSON to `logfile` if given.  Keep the returned guard alive until the
    /// program exits, or buffered JSON records are lost.
    pub fn init_logging(logfile: Option<impl AsRef<Path>>) -> anyhow::Result<Option<WorkerGuard>> {
        install(logfile)
    }

    /// Tests share one process, so only the first call installs anything.
    #[allow(dead_code)]
    pub(crate) fn init_test_logging(logfile: Option<impl AsRef<Path>>) -> Option<WorkerGuard> {
        install(logfile).ok().flatten()
    }
}
pub use logging_setup::*;


pub(crate) mod utils {
    use num::PrimInt;

    /// Indices of the set bits of an integer, lowest first.
    pub struct Biterator<B> {
        bits: B,
    }

    impl<B: PrimInt> Biterator<B> {
        pub fn new(bits: B) -> Self {
            Biterator { bits }
        }
    }

    impl<B: PrimInt> Iterator for Biterator<B> {
        type Item = u32;

        fn next(&mut self) -> Option<u32> {
            if self.bits.is_zero() {
                return None;
            }
            let i = self.bits.trailing_zeros();
            // clear the lowest set bit
            self.bits = self.bits & (self.bits - B::one());
            Some(i)
        }

        fn size_hint(&self) -> (usize, Option<usize>) {
            let n = self.bits.count_ones() as usize;
            (n, Some(n))
        }
    }

    impl<B: PrimInt> ExactSizeIterator for Biterator<B> {}


}
