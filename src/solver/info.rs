use super::{ActiveSetSettings, SolverStatus};
use crate::algebra::*;
use crate::io::{ConfigurablePrintTarget, PrintTarget};
use std::io::Write;
use std::time::Duration;

/// Progress information for the [`ActiveSetSolver`](crate::solver::ActiveSetSolver)

#[derive(Default, Debug)]
pub struct ActiveSetInfo<T> {
    /// number of outer (optimality check) iterations
    pub iterations: u32,
    /// number of variables masked to zero over the run
    pub masks: u32,
    /// number of variables brought back into the active set
    pub unmasks: u32,
    /// current number of active variables
    pub nactive: usize,
    /// most negative gradient among masked variables
    pub min_masked_grad: T,
    /// objective value ½x'Ax - x'b of the current iterate
    pub cost: T,
    /// solve time in seconds
    pub solve_time: f64,
    /// current status
    pub status: SolverStatus,

    pub(crate) stream: PrintTarget,
}

impl<T> ActiveSetInfo<T>
where
    T: FloatT,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reset(&mut self) {
        self.iterations = 0;
        self.masks = 0;
        self.unmasks = 0;
        self.nactive = 0;
        self.min_masked_grad = T::zero();
        self.cost = T::nan();
        self.solve_time = 0f64;
        self.status = SolverStatus::Unsolved;
    }

    pub(crate) fn print_configuration(
        &mut self,
        settings: &ActiveSetSettings<T>,
        n: usize,
    ) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        writeln!(
            out,
            "-------------------------------------------------------------"
        )?;
        writeln!(
            out,
            "        splitfit v{}  -  active-set NNLS solver",
            crate::VERSION
        )?;
        writeln!(
            out,
            "-------------------------------------------------------------"
        )?;

        writeln!(out, "\nproblem:")?;
        writeln!(out, "  variables     = {}", n)?;
        writeln!(
            out,
            "  method        = {}",
            if settings.constrain {
                "active set (x >= 0)"
            } else {
                "unconstrained, clamped"
            }
        )?;
        writeln!(out, "  precision     = {} bit", _get_precision_string::<T>())?;
        writeln!(out)?;

        writeln!(out, "settings:")?;
        let max_iter_str = {
            if settings.max_iter == u32::MAX {
                "Inf".to_string()
            } else {
                settings.max_iter.to_string()
            }
        };
        writeln!(
            out,
            "  tol_opt = {:.1e}, tol_active_grad = {:.1e}, max iter = {}",
            settings.tol_opt, settings.tol_active_grad, max_iter_str
        )?;
        writeln!(out)?;
        std::io::Result::Ok(())
    }

    pub(crate) fn print_status_header(
        &mut self,
        settings: &ActiveSetSettings<T>,
    ) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        write!(out, "iter    ")?;
        write!(out, "cost          ")?;
        write!(out, "min grad    ")?;
        write!(out, "active  ")?;
        write!(out, "masks  ")?;
        write!(out, "unmasks")?;
        writeln!(out,)?;
        writeln!(
            out,
            "-------------------------------------------------------------"
        )?;
        out.flush()?;
        std::io::Result::Ok(())
    }

    pub(crate) fn print_status(&mut self, settings: &ActiveSetSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        write!(out, "{:>3}  ", self.iterations)?;
        write!(out, "{:+12.4e}  ", self.cost)?;
        write!(out, "{:+10.2e}  ", self.min_masked_grad)?;
        write!(out, "{:>6}  ", self.nactive)?;
        write!(out, "{:>5}  ", self.masks)?;
        write!(out, "{:>7}", self.unmasks)?;
        writeln!(out,)?;

        std::io::Result::Ok(())
    }

    pub(crate) fn print_footer(&mut self, settings: &ActiveSetSettings<T>) -> std::io::Result<()> {
        if !settings.verbose {
            return std::io::Result::Ok(());
        }

        let out = &mut self.stream;

        writeln!(
            out,
            "-------------------------------------------------------------"
        )?;

        writeln!(out, "Terminated with status = {}", self.status)?;
        writeln!(
            out,
            "iterations = {}, masks = {}, unmasks = {}",
            self.iterations, self.masks, self.unmasks
        )?;

        writeln!(
            out,
            "solve time = {:?}",
            Duration::from_secs_f64(self.solve_time)
        )?;
        out.flush()?;

        std::io::Result::Ok(())
    }
}

impl<T> ConfigurablePrintTarget for ActiveSetInfo<T> {
    fn print_to_stdout(&mut self) {
        self.stream.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.stream.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        self.stream.print_to_stream(stream)
    }
    fn print_to_sink(&mut self) {
        self.stream.print_to_sink()
    }
    fn print_to_buffer(&mut self) {
        self.stream.print_to_buffer()
    }
    fn print_to_log(&mut self) {
        self.stream.print_to_log()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.stream.get_print_buffer()
    }
}

fn _get_precision_string<T: FloatT>() -> String {
    (::std::mem::size_of::<T>() * 8).to_string()
}
