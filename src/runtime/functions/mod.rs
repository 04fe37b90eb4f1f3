pub mod arithmetic;
pub use arithmetic::*;

pub mod comparison;
pub use comparison::*;

pub mod logical;
pub use logical::*;

pub mod null_check;
pub use null_check::*;

pub mod in_list;
pub use in_list::*;

pub mod if_impl;
pub use if_impl::*;

pub mod math;
pub use math::*;

pub mod now_impl;
pub use now_impl::*;

pub mod sum_impl;
pub use sum_impl::*;

pub mod minmax_impl;
pub use minmax_impl::*;

pub mod count_impl;
pub use count_impl::*;
