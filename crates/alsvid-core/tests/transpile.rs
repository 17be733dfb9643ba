//! End-to-end tests of the orchestration facade.

use alsvid_compile::{CouplingMap, GateSet, Target};
use alsvid_core::{
    Alsvid, AlsvidError, LibId, Program, QdmiDevice, TranspileRequest, TranspilerOptions,
};
use alsvid_ir::{Circuit, QubitId};
use hiq_circ::{Architecture, BackendInfo, HiqCircuit, Op, UnitId};

fn hh_circuit() -> Circuit {
    let mut circuit = Circuit::with_size("pair", 1, 0);
    circuit.h(QubitId(0)).unwrap().h(QubitId(0)).unwrap();
    circuit
}

#[test]
fn redundant_hadamards_cancel_with_native_backend() {
    let alsvid = Alsvid::new();
    let result = alsvid
        .transpile(&Program::from(hh_circuit()), &TranspileRequest::new())
        .unwrap();

    assert_eq!(result.stats.before.n_gates, 2);
    assert_eq!(result.stats.after.n_gates, 0);
    assert!(result.transpiled_program.as_circuit().is_some());
}

#[test]
fn redundant_x_pair_cancels_through_text_and_hiq_backend() {
    let qasm = "
        OPENQASM 3.0;
        include \"stdgates.inc\";
        qubit[1] q;
        x q[0];
        x q[0];
    ";
    let alsvid = Alsvid::new();
    let request = TranspileRequest::new()
        .with_program_lib(LibId::qasm3())
        .with_transpiler_lib(LibId::hiq())
        .with_optimization_level(1);
    let result = alsvid.transpile(&Program::from(qasm), &request).unwrap();

    assert!(result.transpiled_program.as_text().is_some());
    assert_eq!(result.stats.before.n_gates, 2);
    assert_eq!(result.stats.after.n_gates, 0);
}

#[test]
fn text_program_requires_explicit_library() {
    let alsvid = Alsvid::new();
    let err = alsvid
        .transpile(&Program::from("OPENQASM 3.0;"), &TranspileRequest::new())
        .unwrap_err();
    assert!(matches!(err, AlsvidError::ProgramLibNotFound));
}

#[test]
fn program_library_is_autodetected() {
    let alsvid = Alsvid::new();

    let mut hiq = HiqCircuit::new("auto");
    hiq.add_qubits(1);
    hiq.push(Op::H, vec![UnitId::qubit(0)]).unwrap();
    hiq.push(Op::H, vec![UnitId::qubit(0)]).unwrap();

    // No program_lib given: detection finds the hiq shape, the global
    // default backend transpiles it, and the result comes back as a
    // hiq circuit.
    let result = alsvid
        .transpile(&Program::from(hiq), &TranspileRequest::new())
        .unwrap();
    assert!(result.transpiled_program.as_hiq().is_some());
    assert_eq!(result.stats.after.n_gates, 0);
}

#[test]
fn invalid_optimization_level_fails_without_output() {
    let alsvid = Alsvid::new();
    let request = TranspileRequest::new()
        .with_options(TranspilerOptions::optimization(99));
    let err = alsvid
        .transpile(&Program::from(hh_circuit()), &request)
        .unwrap_err();
    assert!(matches!(err, AlsvidError::InvalidOptimizationLevel { .. }));
}

#[test]
fn stats_reference_circuit() {
    let mut circuit = Circuit::with_size("ref", 2, 0);
    circuit.h(QubitId(0)).unwrap();
    circuit.x(QubitId(0)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();

    let alsvid = Alsvid::new();
    let request = TranspileRequest::new().with_optimization_level(0);
    let result = alsvid.transpile(&Program::from(circuit), &request).unwrap();

    let before = result.stats.before;
    assert_eq!(before.n_qubits, 2);
    assert_eq!(before.n_gates, 3);
    assert_eq!(before.n_gates_1q, 2);
    assert_eq!(before.n_gates_2q, 1);
    assert_eq!(before.depth, 3);
}

#[test]
fn identity_mapping_without_device() {
    let mut circuit = Circuit::with_size("idmap", 3, 2);
    circuit.h(QubitId(0)).unwrap();

    let alsvid = Alsvid::new();
    let result = alsvid
        .transpile(&Program::from(circuit), &TranspileRequest::new())
        .unwrap();

    let mapping = &result.virtual_physical_mapping;
    assert_eq!(mapping.qubit_mapping.len(), 3);
    assert_eq!(mapping.bit_mapping.len(), 2);
    for i in 0..3 {
        assert_eq!(mapping.qubit_mapping[&i], i);
    }
}

#[test]
fn adjacent_cx_respects_connectivity_native_backend() {
    let mut circuit = Circuit::with_size("routed", 2, 0);
    circuit.cx(QubitId(1), QubitId(0)).unwrap();

    let target = Target::new("pair", 2)
        .with_gate_set(GateSet::new(["cx"]))
        .with_coupling(CouplingMap::from_edges(2, [(0, 1)]));

    let alsvid = Alsvid::new();
    let request = TranspileRequest::new()
        .with_device(target)
        .with_optimization_level(2);
    let result = alsvid.transpile(&Program::from(circuit), &request).unwrap();

    assert_eq!(result.stats.after.n_gates, 1);
    assert_eq!(result.stats.after.n_gates_2q, 1);
    assert_eq!(result.virtual_physical_mapping.qubit_mapping[&0], 0);
    assert_eq!(result.virtual_physical_mapping.qubit_mapping[&1], 1);
}

#[test]
fn adjacent_cx_respects_connectivity_hiq_backend_from_text() {
    let qasm = "
        OPENQASM 3.0;
        include \"stdgates.inc\";
        qubit[2] q;
        cx q[1], q[0];
    ";
    let info = BackendInfo::new("test_device", 2)
        .with_version("1.0.0")
        .with_gate_set(["CX"])
        .with_architecture(Architecture::new(2, vec![(0, 1)]));

    let alsvid = Alsvid::new();
    let request = TranspileRequest::new()
        .with_program_lib(LibId::qasm3())
        .with_transpiler_lib(LibId::hiq())
        .with_device(info)
        .with_device_lib(LibId::hiq())
        .with_optimization_level(2);
    let result = alsvid.transpile(&Program::from(qasm), &request).unwrap();

    let text = result.transpiled_program.as_text().unwrap();
    assert!(text.contains("cx"), "expected a CX gate in:\n{text}");
    assert_eq!(result.stats.after.n_gates, 1);
    assert_eq!(result.stats.after.n_gates_2q, 1);
    assert_eq!(result.virtual_physical_mapping.qubit_mapping[&0], 0);
    assert_eq!(result.virtual_physical_mapping.qubit_mapping[&1], 1);
}

#[test]
fn distant_cx_gets_routed_with_swaps() {
    let mut circuit = Circuit::with_size("line", 3, 0);
    circuit.cx(QubitId(0), QubitId(2)).unwrap();

    let target = Target::new("line3", 3)
        .with_gate_set(GateSet::standard())
        .with_coupling(CouplingMap::linear(3));

    let alsvid = Alsvid::new();
    let request = TranspileRequest::new().with_device(target).with_optimization_level(1);
    let result = alsvid.transpile(&Program::from(circuit), &request).unwrap();

    // Routing adds gates; after-count may exceed before-count.
    assert!(result.stats.after.n_gates > result.stats.before.n_gates);
    // The mapping tracks the swap: logical 0 ends away from node 0.
    let mapping = &result.virtual_physical_mapping.qubit_mapping;
    assert_eq!(mapping.len(), 3);
    assert_ne!(mapping[&0], 0);
}

#[test]
fn qdmi_device_uses_registered_default_backend() {
    let qasm = "
        OPENQASM 3.0;
        qubit[2] q;
        cx q[1], q[0];
    ";
    let device = QdmiDevice::with_qubit_count("cal-2q", 2).with_coupling(0, 1);

    let alsvid = Alsvid::new();
    // No transpiler_lib: the qdmi device library's default (the text
    // backend) is used, so text must come back as text.
    let request = TranspileRequest::new()
        .with_program_lib(LibId::qasm3())
        .with_device(device)
        .with_optimization_level(2);
    let result = alsvid.transpile(&Program::from(qasm), &request).unwrap();

    assert!(result.transpiled_program.as_text().is_some());
    assert_eq!(result.stats.after.n_gates_2q, 1);
    assert_eq!(result.virtual_physical_mapping.qubit_mapping[&0], 0);
    assert_eq!(result.virtual_physical_mapping.qubit_mapping[&1], 1);
}

#[test]
fn cross_representation_round_trip_preserves_counts() {
    // alsvid circuit through the hiq backend at level 0: converted
    // there and back with structural counts intact.
    let circuit = Circuit::ghz(4).unwrap();
    let n_ops = circuit.dag().num_ops();

    let alsvid = Alsvid::new();
    let request = TranspileRequest::new()
        .with_transpiler_lib(LibId::hiq())
        .with_optimization_level(0);
    let result = alsvid.transpile(&Program::from(circuit), &request).unwrap();

    let returned = result.transpiled_program.as_circuit().unwrap();
    assert_eq!(returned.num_qubits(), 4);
    assert_eq!(returned.dag().num_ops(), n_ops);
    assert_eq!(result.stats.before.n_gates, result.stats.after.n_gates);
}

#[test]
fn unsupported_gate_conversion_failure_propagates() {
    use alsvid_ir::{Instruction, StandardGate};

    let mut circuit = Circuit::with_size("iswap", 2, 0);
    circuit
        .apply(Instruction::two_qubit_gate(StandardGate::ISwap, QubitId(0), QubitId(1)))
        .unwrap();

    let alsvid = Alsvid::new();
    let request = TranspileRequest::new().with_transpiler_lib(LibId::hiq());
    let err = alsvid.transpile(&Program::from(circuit), &request).unwrap_err();
    assert!(matches!(err, AlsvidError::Interop(_)));
}

#[test]
fn duplicate_registrations_rejected() {
    use alsvid_core::ProgramConverter;

    struct NoopConverter;
    impl ProgramConverter for NoopConverter {
        fn convert(&self, program: &Program) -> Result<Program, AlsvidError> {
            Ok(program.clone())
        }
    }

    let mut alsvid = Alsvid::new();
    let err = alsvid
        .register_program_converter(LibId::alsvid(), LibId::hiq(), Box::new(NoopConverter))
        .unwrap_err();
    assert!(matches!(err, AlsvidError::ConverterAlreadyRegistered { .. }));

    let err = alsvid
        .register_default_transpiler_lib(LibId::qdmi(), LibId::alsvid())
        .unwrap_err();
    assert!(matches!(err, AlsvidError::DefaultTranspilerLibAlreadyRegistered(_)));
}

#[test]
fn caller_registered_type_shadows_builtin() {
    let mut alsvid = Alsvid::new();
    // A later registration for the same shape wins, and a transpiler
    // must exist under the new id for the flow to resolve.
    alsvid.register_program_type(LibId::new("custom"), |p| matches!(p, Program::Circuit(_)));

    let err = alsvid
        .transpile(&Program::from(hh_circuit()), &TranspileRequest::new())
        .unwrap_err();
    assert!(matches!(err, AlsvidError::ConverterNotFound { .. }));
}

#[test]
fn transpiled_text_is_reusable() {
    let qasm = "
        OPENQASM 3.0;
        qubit[2] q;
        bit[2] c;
        h q[0];
        cx q[0], q[1];
        c[0] = measure q[0];
        c[1] = measure q[1];
    ";
    let alsvid = Alsvid::new();
    let request = TranspileRequest::new().with_program_lib(LibId::qasm3());
    let result = alsvid.transpile(&Program::from(qasm), &request).unwrap();

    // Feed the output straight back in.
    let text = result.transpiled_program.as_text().unwrap().to_string();
    let again = alsvid
        .transpile(&Program::from(text), &request)
        .unwrap();
    assert_eq!(again.stats.before.n_gates, result.stats.after.n_gates);
}

#[test]
fn device_without_gate_set_or_architecture_fails_on_hiq_backend() {
    let mut hiq = HiqCircuit::new("t");
    hiq.add_qubits(1);
    hiq.push(Op::H, vec![UnitId::qubit(0)]).unwrap();

    let alsvid = Alsvid::new();
    let request = TranspileRequest::new()
        .with_transpiler_lib(LibId::hiq())
        .with_device(BackendInfo::new("shapeless", 4));
    let err = alsvid.transpile(&Program::from(hiq), &request).unwrap_err();
    assert!(matches!(err, AlsvidError::DeviceMissingGateSet(_)));
}
