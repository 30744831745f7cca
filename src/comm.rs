//! Worker groups

use crate::traits::WorkerGroup;

/// A group made of the calling process alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleProcess;

impl WorkerGroup for SingleProcess {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn broadcast_f64(&self, _buffer: &mut [f64], root: usize) {
        debug_assert_eq!(root, 0);
    }

    fn broadcast_u8(&self, _buffer: &mut [u8], root: usize) {
        debug_assert_eq!(root, 0);
    }

    fn abort(&self, _code: i32) {}
}

#[cfg(feature = "mpi")]
pub use parallel::MpiGroup;

#[cfg(feature = "mpi")]
mod parallel {
    use crate::traits::WorkerGroup;
    use mpi::{topology::Communicator, traits::Root};

    /// A worker group over an MPI communicator.
    pub struct MpiGroup<'comm, C: Communicator> {
        comm: &'comm C,
    }

    impl<'comm, C: Communicator> MpiGroup<'comm, C> {
        /// Create a worker group
        pub fn new(comm: &'comm C) -> Self {
            Self { comm }
        }

        /// The underlying communicator
        pub fn comm(&self) -> &'comm C {
            self.comm
        }
    }

    impl<'comm, C: Communicator> WorkerGroup for MpiGroup<'comm, C> {
        fn rank(&self) -> usize {
            self.comm.rank() as usize
        }

        fn size(&self) -> usize {
            self.comm.size() as usize
        }

        fn broadcast_f64(&self, buffer: &mut [f64], root: usize) {
            self.comm
                .process_at_rank(root as i32)
                .broadcast_into(buffer);
        }

        fn broadcast_u8(&self, buffer: &mut [u8], root: usize) {
            self.comm
                .process_at_rank(root as i32)
                .broadcast_into(buffer);
        }

        fn abort(&self, code: i32) {
            self.comm.abort(code)
        }
    }
}
