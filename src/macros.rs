/// Declares a public const combining bitflags of one type.
///
/// ```
/// glowgpu::pub_const_flag!(SAMPLED: glowgpu::wgpu::TextureUsages = RENDER_ATTACHMENT | TEXTURE_BINDING);
/// assert!(SAMPLED.contains(glowgpu::wgpu::TextureUsages::TEXTURE_BINDING));
/// ```
#[macro_export]
macro_rules! pub_const_flag {
    ($name:ident: $t:ty = $($flag:ident)|+) => {
        pub const $name: $t = $crate::const_flag!($t, $($flag)|+);
    };
}

/// Combines bitflags of one type in a const context.
#[macro_export]
macro_rules! const_flag {
    ($t:ty, $($flag:ident)|+) => {
        <$t>::empty()$(.union(<$t>::$flag))+
    };
}

/// Implements `Deref` to the wrapped wgpu type stored in `inner`.
#[macro_export]
macro_rules! wgpu_inner_deref {
    ($name:ident, $target:ty) => {
        impl std::ops::Deref for $name {
            type Target = $target;
            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }
    };
}
