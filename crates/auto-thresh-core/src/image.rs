use ndarray::{ArrayView, ArrayViewD, CowArray, Dimension, IxDyn};

/// Dynamically typed N-dimensional grayscale image view.
///
/// Pixel data stays borrowed in its storage type; promotion to `f64`
/// happens once, at the algorithm boundary. Integer-backed variants get
/// one histogram bin per value, float-backed variants are binned into
/// `nbins` uniform buckets.
#[derive(Clone, Debug)]
pub enum DynImage<'a> {
    U8(ArrayViewD<'a, u8>),
    U16(ArrayViewD<'a, u16>),
    I32(ArrayViewD<'a, i32>),
    F32(ArrayViewD<'a, f32>),
    F64(ArrayViewD<'a, f64>),
}

macro_rules! for_each_variant {
    ($self:expr, $view:ident => $body:expr) => {
        match $self {
            DynImage::U8($view) => $body,
            DynImage::U16($view) => $body,
            DynImage::I32($view) => $body,
            DynImage::F32($view) => $body,
            DynImage::F64($view) => $body,
        }
    };
}

impl<'a> DynImage<'a> {
    pub fn ndim(&self) -> usize {
        for_each_variant!(self, v => v.ndim())
    }

    pub fn shape(&self) -> &[usize] {
        for_each_variant!(self, v => v.shape())
    }

    pub fn len(&self) -> usize {
        for_each_variant!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the storage type is integer-valued.
    pub fn is_integral(&self) -> bool {
        matches!(self, DynImage::U8(_) | DynImage::U16(_) | DynImage::I32(_))
    }

    /// All samples flattened to `f64` in logical order.
    pub fn samples(&self) -> Vec<f64> {
        match self {
            DynImage::U8(v) => v.iter().map(|&x| f64::from(x)).collect(),
            DynImage::U16(v) => v.iter().map(|&x| f64::from(x)).collect(),
            DynImage::I32(v) => v.iter().map(|&x| f64::from(x)).collect(),
            DynImage::F32(v) => v.iter().map(|&x| f64::from(x)).collect(),
            DynImage::F64(v) => v.iter().copied().collect(),
        }
    }

    /// The image as an `f64` array of the same shape, borrowing when the
    /// storage is already `f64`.
    pub fn to_f64(&self) -> CowArray<'a, f64, IxDyn> {
        match self {
            DynImage::U8(v) => CowArray::from(v.mapv(f64::from)),
            DynImage::U16(v) => CowArray::from(v.mapv(f64::from)),
            DynImage::I32(v) => CowArray::from(v.mapv(f64::from)),
            DynImage::F32(v) => CowArray::from(v.mapv(f64::from)),
            DynImage::F64(v) => CowArray::from(v.clone()),
        }
    }

    /// Representable value range of the storage type. Float images follow
    /// the unit-interval convention for normalized image data.
    pub fn dtype_range(&self) -> (f64, f64) {
        match self {
            DynImage::U8(_) => (0.0, f64::from(u8::MAX)),
            DynImage::U16(_) => (0.0, f64::from(u16::MAX)),
            DynImage::I32(_) => (f64::from(i32::MIN), f64::from(i32::MAX)),
            DynImage::F32(_) | DynImage::F64(_) => (-1.0, 1.0),
        }
    }

    /// The single sample value if every sample compares equal (NaN never does).
    pub fn constant_value(&self) -> Option<f64> {
        let samples = self.samples();
        let (&first, rest) = samples.split_first()?;
        rest.iter().all(|&v| v == first).then_some(first)
    }

    /// Histogram-domain selectors expect grayscale data. A trailing axis of
    /// length 3 or 4 usually means an RGB(A) image was passed by mistake;
    /// the data is still processed as-is.
    pub fn warn_if_color(&self) {
        if self.ndim() > 2 && matches!(self.shape().last(), Some(&3) | Some(&4)) {
            log::warn!(
                "image with shape {:?} looks like a color image; \
                 thresholding treats every channel sample alike",
                self.shape()
            );
        }
    }
}

macro_rules! impl_from_view {
    ($t:ty, $variant:ident) => {
        impl<'a, D: Dimension> From<ArrayView<'a, $t, D>> for DynImage<'a> {
            fn from(view: ArrayView<'a, $t, D>) -> Self {
                DynImage::$variant(view.into_dyn())
            }
        }
    };
}

impl_from_view!(u8, U8);
impl_from_view!(u16, U16);
impl_from_view!(i32, I32);
impl_from_view!(f32, F32);
impl_from_view!(f64, F64);
