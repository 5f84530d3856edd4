use axon_nn::{DataSet, LearningConfig, NetworkSpec, SupervisedLearning, TransferFunction, UpdateRuleType};

fn main() -> axon_nn::Result<()> {
    let data = DataSet::from_rows(
        &[vec![1.0, 0.0], vec![1.0, 1.0], vec![0.0, 1.0], vec![0.0, 0.0]],
        &[vec![1.0], vec![0.0], vec![1.0], vec![0.0]],
    )?;

    let mut network = NetworkSpec::perceptron(TransferFunction::Sigmoid, &[2, 3, 1]).build_with_seed(7)?;

    let config = LearningConfig::new(0.2, 0.01)
        .with_max_iterations(20_000)
        .with_update_rule(UpdateRuleType::Momentum { momentum: 0.7 });
    let mut rule = SupervisedLearning::new(config)?;
    rule.add_listener(|event| {
        if event.iteration % 1000 == 0 {
            println!("Epoch {}: error = {:.6}", event.iteration, event.total_error);
        }
    });
    network.set_learning_rule(rule);

    let outcome = network.learn(&data)?;
    println!(
        "Finished after {} epochs ({:?}, {:?}), error = {:.6}",
        outcome.iterations, outcome.state, outcome.reason, outcome.total_error
    );

    for row in data.rows() {
        let output = network.predict(&row.input)?;
        println!("Input: {:?} -> Output: {:.4}", row.input, output[0]);
    }
    Ok(())
}
