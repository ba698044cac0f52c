#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use synthseg_image as image;

#[doc(inline)]
pub use synthseg_imgproc as imgproc;

#[doc(inline)]
pub use synthseg_io as io;

#[doc(inline)]
pub use synthseg_augment as augment;

#[doc(inline)]
pub use synthseg_dataset as dataset;
