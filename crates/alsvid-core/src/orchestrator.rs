//! The transpilation facade.

use tracing::{debug, instrument};

use crate::device::Device;
use crate::device_converter::{
    BackendInfoToTargetConverter, DeviceConverter, DeviceConverterRegistry,
    PassThroughDeviceConverter, QdmiToBackendInfoConverter, QdmiToTargetConverter,
    TargetToBackendInfoConverter,
};
use crate::error::AlsvidError;
use crate::lib_id::LibId;
use crate::program::Program;
use crate::program_converter::{
    CircuitToHiqConverter, CircuitToQasm3Converter, HiqToCircuitConverter, HiqToQasm3Converter,
    ProgramConverter, ProgramConverterRegistry, Qasm3ToCircuitConverter, Qasm3ToHiqConverter,
};
use crate::transpiler::{
    AlsvidTranspiler, HiqTranspiler, Qasm3Transpiler, TranspileResult, Transpiler,
    TranspilerOptions, TranspilerRegistry,
};
use crate::type_registry::{DeviceTypeRegistry, Matcher, ProgramTypeRegistry};

/// A transpilation request: everything besides the program itself.
///
/// All fields are optional; omitted libraries are auto-detected, the
/// transpiler falls back to the device library's registered default
/// and then to the global default.
#[derive(Default)]
pub struct TranspileRequest {
    /// Library of the input program.
    pub program_lib: Option<LibId>,
    /// Transpiler to use.
    pub transpiler_lib: Option<LibId>,
    /// Target device.
    pub device: Option<Device>,
    /// Library of the target device.
    pub device_lib: Option<LibId>,
    /// Backend options.
    pub options: TranspilerOptions,
}

impl TranspileRequest {
    /// An empty request (all defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the program library explicitly.
    #[must_use]
    pub fn with_program_lib(mut self, lib: LibId) -> Self {
        self.program_lib = Some(lib);
        self
    }

    /// Set the transpiler library explicitly.
    #[must_use]
    pub fn with_transpiler_lib(mut self, lib: LibId) -> Self {
        self.transpiler_lib = Some(lib);
        self
    }

    /// Set the target device.
    #[must_use]
    pub fn with_device(mut self, device: impl Into<Device>) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Set the device library explicitly.
    #[must_use]
    pub fn with_device_lib(mut self, lib: LibId) -> Self {
        self.device_lib = Some(lib);
        self
    }

    /// Set the backend options.
    #[must_use]
    pub fn with_options(mut self, options: TranspilerOptions) -> Self {
        self.options = options;
        self
    }

    /// Shortcut for setting only the optimization level.
    #[must_use]
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.options = self.options.with("optimization_level", level);
        self
    }
}

/// The orchestration facade.
///
/// Owns the type, converter, and transpiler registries. Construction
/// installs the built-in associations; callers may extend them before
/// use through the `register_*` methods. `transpile` takes `&self`, so
/// a configured instance may be shared across threads.
pub struct Alsvid {
    program_types: ProgramTypeRegistry,
    device_types: DeviceTypeRegistry,
    program_converters: ProgramConverterRegistry,
    device_converters: DeviceConverterRegistry,
    transpilers: TranspilerRegistry,
    default_transpiler_lib: LibId,
}

impl Alsvid {
    /// Create a facade with all built-in ecosystems registered.
    pub fn new() -> Self {
        let mut program_types = ProgramTypeRegistry::new();
        program_types.register_type(LibId::alsvid(), |p| matches!(p, Program::Circuit(_)));
        program_types.register_type(LibId::hiq(), |p| matches!(p, Program::Hiq(_)));
        // Program::Text is deliberately not registered: text carries no
        // library information and must be named explicitly.

        let mut device_types = DeviceTypeRegistry::new();
        device_types.register_type(LibId::alsvid(), |d| matches!(d, Device::Target(_)));
        device_types.register_type(LibId::hiq(), |d| matches!(d, Device::Hiq(_)));
        device_types.register_type(LibId::qdmi(), |d| matches!(d, Device::Qdmi(_)));

        let mut program_converters = ProgramConverterRegistry::new();
        let builtin = "built-in converter registration cannot conflict";
        program_converters
            .register_converter(LibId::alsvid(), LibId::hiq(), Box::new(CircuitToHiqConverter))
            .expect(builtin);
        program_converters
            .register_converter(LibId::hiq(), LibId::alsvid(), Box::new(HiqToCircuitConverter))
            .expect(builtin);
        program_converters
            .register_converter(LibId::alsvid(), LibId::qasm3(), Box::new(CircuitToQasm3Converter))
            .expect(builtin);
        program_converters
            .register_converter(LibId::qasm3(), LibId::alsvid(), Box::new(Qasm3ToCircuitConverter))
            .expect(builtin);
        program_converters
            .register_converter(LibId::hiq(), LibId::qasm3(), Box::new(HiqToQasm3Converter))
            .expect(builtin);
        program_converters
            .register_converter(LibId::qasm3(), LibId::hiq(), Box::new(Qasm3ToHiqConverter))
            .expect(builtin);

        let mut device_converters = DeviceConverterRegistry::new();
        device_converters
            .register_converter(LibId::qdmi(), LibId::alsvid(), Box::new(QdmiToTargetConverter))
            .expect(builtin);
        device_converters
            .register_converter(LibId::qdmi(), LibId::qasm3(), Box::new(QdmiToTargetConverter))
            .expect(builtin);
        device_converters
            .register_converter(LibId::qdmi(), LibId::hiq(), Box::new(QdmiToBackendInfoConverter))
            .expect(builtin);
        device_converters
            .register_converter(
                LibId::alsvid(),
                LibId::hiq(),
                Box::new(TargetToBackendInfoConverter),
            )
            .expect(builtin);
        device_converters
            .register_converter(
                LibId::hiq(),
                LibId::alsvid(),
                Box::new(BackendInfoToTargetConverter),
            )
            .expect(builtin);
        device_converters
            .register_converter(
                LibId::hiq(),
                LibId::qasm3(),
                Box::new(BackendInfoToTargetConverter),
            )
            .expect(builtin);
        device_converters
            .register_converter(
                LibId::alsvid(),
                LibId::qasm3(),
                Box::new(PassThroughDeviceConverter),
            )
            .expect(builtin);

        let mut transpilers = TranspilerRegistry::new();
        transpilers
            .register_transpiler(LibId::alsvid(), Box::new(AlsvidTranspiler::new()))
            .expect(builtin);
        transpilers
            .register_transpiler(LibId::hiq(), Box::new(HiqTranspiler::new()))
            .expect(builtin);
        transpilers
            .register_transpiler(LibId::qasm3(), Box::new(Qasm3Transpiler::new()))
            .expect(builtin);
        transpilers
            .register_default_transpiler_lib(LibId::qdmi(), LibId::qasm3())
            .expect(builtin);

        Self {
            program_types,
            device_types,
            program_converters,
            device_converters,
            transpilers,
            default_transpiler_lib: LibId::alsvid(),
        }
    }

    /// Transpile a program.
    ///
    /// Resolution order for every omitted library: explicit request
    /// value, auto-detection, the device library's registered default
    /// (transpiler only), the global default (transpiler only). The
    /// result program comes back in the caller's original
    /// representation.
    #[instrument(skip_all)]
    pub fn transpile(
        &self,
        program: &Program,
        request: &TranspileRequest,
    ) -> Result<TranspileResult, AlsvidError> {
        let program_lib = match &request.program_lib {
            Some(lib) => lib.clone(),
            None => self.program_types.detect_lib(program)?,
        };

        let device_lib = match (&request.device, &request.device_lib) {
            (None, _) => None,
            (Some(_), Some(lib)) => Some(lib.clone()),
            (Some(device), None) => Some(self.device_types.detect_lib(device)?),
        };

        let transpiler_lib = request
            .transpiler_lib
            .clone()
            .or_else(|| {
                device_lib
                    .as_ref()
                    .and_then(|lib| self.transpilers.get_default_transpiler_lib(lib).cloned())
            })
            .unwrap_or_else(|| self.default_transpiler_lib.clone());
        debug!(
            "Transpiling {} program with '{}' backend",
            program_lib, transpiler_lib
        );

        let transpiler = self.transpilers.get_transpiler(&transpiler_lib)?;
        let native_lib = transpiler.program_lib().clone();

        let converted = self
            .program_converters
            .get_converter(&program_lib, &native_lib)?
            .convert(program)?;

        let native_device = match (&request.device, &device_lib) {
            (Some(device), Some(lib)) => Some(
                self.device_converters
                    .get_converter(lib, &transpiler_lib)?
                    .convert(device)?,
            ),
            _ => None,
        };

        let result =
            transpiler.transpile(&converted, &request.options, native_device.as_ref())?;

        let transpiled_program = self
            .program_converters
            .get_converter(&native_lib, &program_lib)?
            .convert(&result.transpiled_program)?;

        Ok(TranspileResult {
            transpiled_program,
            stats: result.stats,
            virtual_physical_mapping: result.virtual_physical_mapping,
        })
    }

    /// Register a program shape for auto-detection.
    pub fn register_program_type(&mut self, lib: LibId, matcher: Matcher<Program>) {
        self.program_types.register_type(lib, matcher);
    }

    /// Register a device shape for auto-detection.
    pub fn register_device_type(&mut self, lib: LibId, matcher: Matcher<Device>) {
        self.device_types.register_type(lib, matcher);
    }

    /// Register a program converter.
    pub fn register_program_converter(
        &mut self,
        source: LibId,
        target: LibId,
        converter: Box<dyn ProgramConverter>,
    ) -> Result<(), AlsvidError> {
        self.program_converters.register_converter(source, target, converter)
    }

    /// Register a device converter.
    pub fn register_device_converter(
        &mut self,
        source: LibId,
        target: LibId,
        converter: Box<dyn DeviceConverter>,
    ) -> Result<(), AlsvidError> {
        self.device_converters.register_converter(source, target, converter)
    }

    /// Register a transpiler.
    pub fn register_transpiler(
        &mut self,
        lib: LibId,
        transpiler: Box<dyn Transpiler>,
    ) -> Result<(), AlsvidError> {
        self.transpilers.register_transpiler(lib, transpiler)
    }

    /// Register the default transpiler library for a device library.
    pub fn register_default_transpiler_lib(
        &mut self,
        device_lib: LibId,
        transpiler_lib: LibId,
    ) -> Result<(), AlsvidError> {
        self.transpilers.register_default_transpiler_lib(device_lib, transpiler_lib)
    }
}

impl Default for Alsvid {
    fn default() -> Self {
        Self::new()
    }
}
