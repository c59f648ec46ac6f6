use alloc::boxed::Box;
use alloc::sync::Arc;

use crate::info::{Type, TypeInfo, TypePath};
use crate::{Reflect, ReflectRef};

// -----------------------------------------------------------------------------
// Option

impl<T: TypePath> TypePath for Option<T> {
    #[inline]
    fn element_type() -> Type {
        T::element_type()
    }
}

impl<T: Reflect> Reflect for Option<T> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        match self {
            Some(value) => value.reflect_ref(),
            None => ReflectRef::Null,
        }
    }

    #[inline]
    fn represented(&self) -> Option<&dyn Reflect> {
        self.as_ref()?.represented()
    }

    #[inline]
    fn reflect_type_info(&self) -> Option<&'static TypeInfo> {
        self.as_ref()?.reflect_type_info()
    }
}

// -----------------------------------------------------------------------------
// Smart pointers

macro_rules! impl_reflect_pointer {
    ($($ptr:ident),*) => {$(
        impl<T: TypePath> TypePath for $ptr<T> {
            #[inline]
            fn element_type() -> Type {
                T::element_type()
            }
        }

        impl<T: Reflect> Reflect for $ptr<T> {
            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                (**self).reflect_ref()
            }

            #[inline]
            fn represented(&self) -> Option<&dyn Reflect> {
                (**self).represented()
            }

            #[inline]
            fn reflect_type_info(&self) -> Option<&'static TypeInfo> {
                (**self).reflect_type_info()
            }
        }
    )*};
}

impl_reflect_pointer!(Box, Arc);

impl TypePath for Box<dyn Reflect> {}

impl Reflect for Box<dyn Reflect> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        (**self).reflect_ref()
    }

    #[inline]
    fn represented(&self) -> Option<&dyn Reflect> {
        (**self).represented()
    }

    #[inline]
    fn reflect_type_info(&self) -> Option<&'static TypeInfo> {
        (**self).reflect_type_info()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::sync::Arc;

    use crate::info::{Type, TypePath};
    use crate::{Reflect, ReflectRef};

    #[test]
    fn wrappers_forward_to_content() {
        let value: &dyn Reflect = &Some(Arc::new(Box::new(4_u8)));
        assert!(matches!(value.reflect_ref(), ReflectRef::UInt(4)));
        assert_eq!(value.downcast_represented::<u8>(), Some(&4));
    }

    #[test]
    fn element_type_unwraps() {
        assert_eq!(<Option<Box<String>>>::element_type(), Type::of::<String>());
    }
}
