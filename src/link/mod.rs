//! Byte-oriented transport to the controller.
//!
//! The [`Link`] trait is the seam between the motion logic and the physical port.
//! Implementations own the port; the controller only writes whole frames, reads
//! exact response lengths and checks for stray input.

#[cfg(feature = "std")]
mod serial;
#[cfg(feature = "std")]
mod sim;

#[cfg(feature = "std")]
pub use serial::SerialLink;
#[cfg(feature = "std")]
pub use sim::{SimError, SimulatedController};

/// A half-duplex byte stream to the controller.
pub trait Link {
    /// Transport error type.
    type Error: core::fmt::Debug;

    /// Write every byte of `bytes`.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Fill `buf` completely, or fail.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Number of received bytes not yet read.
    fn bytes_pending(&mut self) -> Result<usize, Self::Error>;

    /// Release the underlying port.
    fn close(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<T: Link + ?Sized> Link for &mut T {
    type Error = T::Error;

    #[inline]
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        T::write_all(self, bytes)
    }

    #[inline]
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        T::read_exact(self, buf)
    }

    #[inline]
    fn bytes_pending(&mut self) -> Result<usize, Self::Error> {
        T::bytes_pending(self)
    }

    #[inline]
    fn close(&mut self) -> Result<(), Self::Error> {
        T::close(self)
    }
}
