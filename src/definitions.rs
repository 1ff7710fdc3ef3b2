/// Expression trees with at most that many nodes are stored on the stack.
pub const N_NODES_ON_STACK: usize = 32;
