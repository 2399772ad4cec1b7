mod core;
mod gemm;
mod gemv;
mod matrix_math;
