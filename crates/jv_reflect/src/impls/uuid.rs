use alloc::borrow::Cow;
use alloc::string::ToString;

use uuid::Uuid;

use crate::ops::MapKey;

crate::impl_reflect_opaque!(Uuid);

impl MapKey for Uuid {
    #[inline]
    fn key_str(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }
}
