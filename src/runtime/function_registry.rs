use std::{collections::HashMap, sync::Arc};

use crate::{
    parser::ast::{BinaryOp, UnaryOp},
    runtime::{
        AbsImpl, AndImpl, ArithmeticImpl, Clock, ComparisonImpl, CountDistinctImpl, CountImpl, Function,
        FunctionHandle, IfImpl, InImpl, IsNotNullImpl, IsNullImpl, MaxImpl, MinImpl, NegateImpl, NotImpl, NowImpl,
        OrImpl, PowImpl, SumImpl, SystemClock,
    },
};

/// Case-insensitive catalog of named functions plus the operator table.
pub struct FunctionRegistry {
    by_name: HashMap<String, FunctionHandle>,
    binary_ops: HashMap<BinaryOp, FunctionHandle>,
    unary_ops: HashMap<UnaryOp, FunctionHandle>,
    in_list: FunctionHandle,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
            binary_ops: HashMap::new(),
            unary_ops: HashMap::new(),
            in_list: FunctionHandle::new(InImpl),
        }
    }

    pub fn register<F: Function + 'static>(&mut self, func: F) {
        self.by_name.insert(func.name().to_string(), FunctionHandle::new(func));
    }

    pub fn register_binary<F: Function + 'static>(&mut self, op: BinaryOp, func: F) {
        self.binary_ops.insert(op, FunctionHandle::new(func));
    }

    pub fn register_unary<F: Function + 'static>(&mut self, op: UnaryOp, func: F) {
        self.unary_ops.insert(op, FunctionHandle::new(func));
    }

    pub fn get(&self, name: &str) -> Option<FunctionHandle> {
        self.by_name.get(&name.to_ascii_lowercase()).cloned()
    }

    pub fn binary_op(&self, op: BinaryOp) -> Option<FunctionHandle> {
        self.binary_ops.get(&op).cloned()
    }

    pub fn unary_op(&self, op: UnaryOp) -> Option<FunctionHandle> {
        self.unary_ops.get(&op).cloned()
    }

    pub fn in_list(&self) -> FunctionHandle {
        self.in_list.clone()
    }

    /// Unknown names are not aggregates; the binder reports them later.
    pub fn is_aggregate(&self, name: &str) -> bool {
        self.get(name).is_some_and(|f| f.is_aggregate())
    }

    pub fn list(&self) -> Vec<String> {
        let mut v: Vec<_> = self.by_name.keys().cloned().collect();
        v.sort();
        v
    }

    /// Builtins with `NOW()` reading the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let mut registry = Self::new();

        for op in [BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mul, BinaryOp::Div, BinaryOp::Mod] {
            registry.register_binary(op, ArithmeticImpl(op));
        }
        for op in [BinaryOp::Eq, BinaryOp::NotEq, BinaryOp::Gt, BinaryOp::Lt, BinaryOp::GtEq, BinaryOp::LtEq] {
            registry.register_binary(op, ComparisonImpl(op));
        }
        registry.register_binary(BinaryOp::And, AndImpl);
        registry.register_binary(BinaryOp::Or, OrImpl);

        registry.register_unary(UnaryOp::Neg, NegateImpl);
        registry.register_unary(UnaryOp::Not, NotImpl);
        registry.register_unary(UnaryOp::IsNull, IsNullImpl);
        registry.register_unary(UnaryOp::IsNotNull, IsNotNullImpl);

        registry.register(IfImpl);
        registry.register(AbsImpl);
        registry.register(PowImpl);
        registry.register(NowImpl::new(clock));

        registry.register(SumImpl);
        registry.register(MinImpl);
        registry.register(MaxImpl);
        registry.register(CountImpl);
        registry.register(CountDistinctImpl);
        registry
    }

    pub fn default_registry() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::default_registry()
    }
}
