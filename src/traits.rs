//! Trait definitions

/// A group of cooperating worker processes.
///
/// Every worker runs the same code on its own memory. The only collective
/// operation needed is a blocking broadcast from one rank to all others:
/// after it returns every worker holds a byte-identical copy of the root's
/// buffer. All workers must call each broadcast with buffers of matching
/// length and element type.
pub trait WorkerGroup {
    /// Rank of this worker
    fn rank(&self) -> usize;

    /// Number of workers in the group
    fn size(&self) -> usize;

    /// Broadcast floating point data from `root` to every worker
    fn broadcast_f64(&self, buffer: &mut [f64], root: usize);

    /// Broadcast bytes from `root` to every worker
    fn broadcast_u8(&self, buffer: &mut [u8], root: usize);

    /// Terminate every worker of the group.
    ///
    /// Groups that cannot terminate their peers return, leaving the caller to
    /// propagate the error.
    fn abort(&self, code: i32);

    /// Whether this worker is the coordinating rank
    fn is_root(&self) -> bool {
        self.rank() == 0
    }
}
